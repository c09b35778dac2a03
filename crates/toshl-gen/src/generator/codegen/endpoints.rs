use std::collections::HashSet;

use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::{
  generator::{
    ast::{ApiMethod, ArgumentShape},
    grouping::ResourceClass,
    metrics::GenerationWarning,
  },
  naming::identifiers::{to_rust_field_name, to_rust_type_name},
};

pub const ROOT_CLIENT: &str = "Toshl";

/// Inherent functions of the root client that endpoint methods must not shadow.
const ROOT_RESERVED: &[&str] = &["new", "with_client", "client"];

const COLLISION_SUFFIX: &str = "_endpoint";

const STANDARD_METHODS: &[&str] = &[
  "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "CONNECT", "TRACE",
];

/// Renders the root client and one borrowing struct per resource class.
pub struct EndpointsEmitter<'a> {
  classes: &'a [ResourceClass],
  arguments: &'a IndexMap<String, ArgumentShape>,
  warnings: Vec<GenerationWarning>,
}

impl<'a> EndpointsEmitter<'a> {
  pub fn new(classes: &'a [ResourceClass], arguments: &'a IndexMap<String, ArgumentShape>) -> Self {
    Self {
      classes,
      arguments,
      warnings: Vec::new(),
    }
  }

  pub fn into_warnings(self) -> Vec<GenerationWarning> {
    self.warnings
  }

  pub fn generate(&mut self) -> TokenStream {
    let classes = self.classes;
    let root = self.root_tokens();
    let resources: Vec<TokenStream> = classes
      .iter()
      .filter(|class| !class.is_root())
      .map(|class| self.resource_tokens(class))
      .collect();

    quote! {
      #root

      #(#resources)*
    }
  }

  fn root_tokens(&mut self) -> TokenStream {
    let classes = self.classes;
    let root_ident = format_ident!("{ROOT_CLIENT}");

    let top_level: Vec<(String, &ResourceClass)> = classes
      .iter()
      .filter(|class| class.is_top_level())
      .map(|class| (class.path[0].clone(), class))
      .collect();

    let accessors = top_level.iter().map(|(crumb, class)| {
      let accessor = format_ident!("{}", to_rust_field_name(crumb));
      let class_ident = format_ident!("{}", to_rust_type_name(&class.name));
      quote! {
        pub fn #accessor(&self) -> #class_ident<'_> {
          #class_ident { client: &self.client }
        }
      }
    });
    let accessors: Vec<TokenStream> = accessors.collect();

    let mut taken: HashSet<String> = top_level.iter().map(|(crumb, _)| to_rust_field_name(crumb)).collect();
    taken.extend(ROOT_RESERVED.iter().map(|name| (*name).to_string()));

    let methods = classes
      .iter()
      .find(|class| class.is_root())
      .map(|root| self.methods_tokens(root, &taken))
      .unwrap_or_default();

    quote! {
      /// Entry point of the generated Toshl client.
      #[derive(Debug, Clone)]
      pub struct #root_ident {
        client: toshl_support::Client,
      }

      impl #root_ident {
        pub fn new(api_key: impl Into<String>) -> Self {
          Self::with_client(toshl_support::Client::new(api_key))
        }

        pub fn with_client(client: toshl_support::Client) -> Self {
          Self { client }
        }

        pub fn client(&self) -> &toshl_support::Client {
          &self.client
        }

        #(#accessors)*

        #(#methods)*
      }
    }
  }

  fn resource_tokens(&mut self, class: &ResourceClass) -> TokenStream {
    let class_ident = format_ident!("{}", to_rust_type_name(&class.name));
    let doc = format!(" Endpoints under `{}`.", class.path.join("."));

    let accessors: Vec<TokenStream> = class
      .subclasses
      .iter()
      .map(|(crumb, child)| {
        let accessor = format_ident!("{}", to_rust_field_name(crumb));
        let child_ident = format_ident!("{}", to_rust_type_name(child));
        quote! {
          pub fn #accessor(&self) -> #child_ident<'a> {
            #child_ident { client: self.client }
          }
        }
      })
      .collect();

    let taken: HashSet<String> = class.subclasses.iter().map(|(crumb, _)| to_rust_field_name(crumb)).collect();
    let methods = self.methods_tokens(class, &taken);

    quote! {
      #[doc = #doc]
      #[derive(Debug, Clone, Copy)]
      pub struct #class_ident<'a> {
        client: &'a toshl_support::Client,
      }

      impl<'a> #class_ident<'a> {
        #(#accessors)*

        #(#methods)*
      }
    }
  }

  fn methods_tokens(&mut self, class: &ResourceClass, taken: &HashSet<String>) -> Vec<TokenStream> {
    let mut methods: Vec<&ApiMethod> = class.methods.iter().collect();
    methods.sort_by(|a, b| a.verb().cmp(b.verb()));

    methods
      .into_iter()
      .map(|method| {
        let name = self.method_name(class, method, taken);
        let argument = method.argument.as_deref().and_then(|argument| self.arguments.get(argument));
        method_tokens(&name, method, argument)
      })
      .collect()
  }

  fn method_name(&mut self, class: &ResourceClass, method: &ApiMethod, taken: &HashSet<String>) -> String {
    let name = to_rust_field_name(method.verb());
    if !taken.contains(&name) {
      return name;
    }

    let renamed = format!("{}{COLLISION_SUFFIX}", name.trim_start_matches("r#"));
    self.warnings.push(GenerationWarning::MethodAccessorCollision {
      class: if class.is_root() {
        ROOT_CLIENT.to_string()
      } else {
        to_rust_type_name(&class.name)
      },
      method: name,
      renamed: renamed.clone(),
    });
    renamed
  }
}

fn method_tokens(name: &str, method: &ApiMethod, argument: Option<&ArgumentShape>) -> TokenStream {
  let method_ident = format_ident!("{name}");
  let href = &method.href;
  let doc = format!(" `{} {}`", method.method, method.href);
  let verb = method_constant(&method.method);

  let path_params: Vec<&str> = href_placeholders(href)
    .into_iter()
    .filter(|placeholder| argument.is_none_or(|shape| shape.root.wire_field(placeholder).is_none()))
    .collect();
  let param_idents: Vec<_> = path_params
    .iter()
    .map(|placeholder| format_ident!("{}", to_rust_field_name(placeholder)))
    .collect();

  let (args_param, args_call) = match argument {
    Some(shape) => {
      let argument_ident = format_ident!("{}", shape.name());
      (
        quote! { args: &super::argument_types::#argument_ident },
        quote! { .argument(args)? },
      )
    }
    None => (quote! {}, quote! {}),
  };

  let (return_type, decode) = match &method.returns {
    Some(returns) => {
      let return_ident = format_ident!("{returns}");
      (
        quote! { toshl_support::Payload<super::return_types::#return_ident> },
        quote! { .decode() },
      )
    }
    None => (quote! { serde_json::Value }, quote! { .into_value() }),
  };

  quote! {
    #[doc = #doc]
    pub fn #method_ident(&self, #(#param_idents: &str,)* #args_param) -> Result<#return_type, toshl_support::ApiError> {
      self
        .client
        .request(#verb, #href)
        #(.path(#path_params, #param_idents))*
        #args_call
        .send()?
        #decode
    }
  }
}

fn method_constant(method: &str) -> TokenStream {
  if STANDARD_METHODS.contains(&method) {
    let ident = format_ident!("{method}");
    quote! { toshl_support::Method::#ident }
  } else {
    let bytes = proc_macro2::Literal::byte_string(method.as_bytes());
    quote! { toshl_support::Method::from_bytes(#bytes).expect("method validated at generation time") }
  }
}

/// Names of the `{placeholder}` segments of an href, in order.
pub(crate) fn href_placeholders(href: &str) -> Vec<&str> {
  href
    .split('/')
    .filter_map(|segment| segment.strip_prefix('{').and_then(|rest| rest.split_once('}')))
    .map(|(name, _)| name)
    .collect()
}
