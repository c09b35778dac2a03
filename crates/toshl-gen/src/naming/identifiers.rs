use std::sync::LazyLock;

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

/// Keywords that are valid as raw identifiers (`r#match`).
const RUST_KEYWORDS: &[&str] = &[
  "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn", "else", "enum",
  "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "macro", "match", "mod", "move",
  "mut", "override", "priv", "pub", "ref", "return", "static", "struct", "trait", "true", "try", "type", "typeof",
  "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Type names a generated record must not shadow in the generated modules.
const RESERVED_TYPE_NAMES: &[&str] = &[
  "Box", "Clone", "Copy", "Display", "Option", "Result", "Self", "Send", "String", "Sync", "Type", "Vec",
];

/// Leading sigils that carry meaning in Toshl wire names and are spelled out
/// instead of being stripped, so `!starred` and `starred` stay distinct.
const LEADING_SIGILS: &[(char, &str)] = &[
  ('!', "exclamation_mark"),
  ('-', "negative"),
  ('+', "plus"),
  ('@', "at"),
  ('$', "dollar"),
];

/// The prefix the field sanitizer produces for `!`-prefixed wire names.
pub(crate) const NEGATION_PREFIX: &str = "exclamation_mark";

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());
static CLASS_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z][a-z0-9]+").unwrap());

/// Transliterates to ASCII, replaces invalid characters with underscores,
/// collapses consecutive underscores and trims leading or trailing underscores.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

fn split_sigil(name: &str) -> (Option<&'static str>, &str) {
  let mut chars = name.chars();
  let Some(first) = chars.next() else {
    return (None, name);
  };

  LEADING_SIGILS
    .iter()
    .find(|(sigil, _)| *sigil == first)
    .map_or((None, name), |(_, word)| (Some(*word), chars.as_str()))
}

/// Converts a wire name into a valid Rust field name (`snake_case`).
///
/// # Rules:
/// 1. A leading sigil (`!`, `-`, `+`, `@`, `$`) is spelled out as a word prefix.
/// 2. Sanitizes the base string and converts it to `snake_case`.
/// 3. `self`, `super` and `crate` get a trailing `_`; other keywords get a raw identifier prefix (`r#`).
/// 4. A leading digit is prefixed with `_`; an empty result becomes `_`.
pub(crate) fn to_rust_field_name(name: &str) -> String {
  let (sigil_word, name_without_sigil) = split_sigil(name);

  let mut ident = sanitize(name_without_sigil).to_snake_case();

  if ident.is_empty() {
    return "_".to_string();
  }

  if let Some(word) = sigil_word {
    ident = format!("{word}_{ident}");
  }

  if matches!(ident.as_str(), "self" | "super" | "crate") {
    ident.push('_');
    return ident;
  }

  if RUST_KEYWORDS.contains(&ident.as_str()) {
    return format!("r#{ident}");
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }

  ident
}

/// Shortens the verbose negation prefix to `not`, keeping the remainder intact.
///
/// `exclamation_mark_starred` becomes `not_starred`; names without the prefix
/// are returned unchanged.
pub(crate) fn shorten_negation(field_name: &str) -> Option<String> {
  field_name
    .strip_prefix(NEGATION_PREFIX)
    .map(|remainder| format!("not{remainder}"))
}

/// Converts a definition name, title or dotted path into a `PascalCase` type name.
///
/// Words are split on anything that is not alphanumeric. A word that already
/// mixes cases keeps its inner capitalization (`CategorySum`), any other word
/// is capitalized (`INF` becomes `Inf`). A leading `-` becomes `Negative`, a
/// leading digit gets a `T` prefix and names in [`RESERVED_TYPE_NAMES`] get a
/// `Record` suffix.
pub(crate) fn to_rust_type_name(name: &str) -> String {
  let (negative, name) = match name.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, name),
  };

  let mut ident: String = sanitize(name).split('_').map(pascal_word).collect();
  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if negative {
    ident.insert_str(0, "Negative");
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }
  if RESERVED_TYPE_NAMES.contains(&ident.as_str()) {
    ident.push_str("Record");
  }
  ident
}

fn pascal_word(word: &str) -> String {
  let mixed = word.chars().any(|c| c.is_ascii_uppercase()) && word.chars().any(|c| c.is_ascii_lowercase());
  if mixed {
    let mut chars = word.chars();
    chars
      .next()
      .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
      .unwrap_or_default()
  } else {
    word.to_lowercase().to_pascal_case()
  }
}

/// Capitalizes a crumb the way class names are assembled: first letter
/// upper case, the rest lower case.
pub(crate) fn capitalize_crumb(crumb: &str) -> String {
  let mut chars = crumb.chars();
  match chars.next() {
    None => String::new(),
    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
  }
}

/// Splits a class name into its capitalized-word tokens.
pub(crate) fn class_name_tokens(class_name: &str) -> Vec<String> {
  CLASS_TOKEN_RE
    .find_iter(class_name)
    .map(|token| token.as_str().to_string())
    .collect()
}
