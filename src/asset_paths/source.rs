/// Translate a stored file name into the file name used by the source tree.
///
/// Served copies carry a collection prefix (for example `as_`) that the source tree does
/// not; names without the prefix are passed through unchanged.
pub fn source_name<'a>(stored_file: &'a str, source_prefix: &str) -> &'a str {
  if source_prefix.is_empty() {
    return stored_file;
  }
  stored_file
    .strip_prefix(source_prefix)
    .filter(|rest| !rest.is_empty())
    .unwrap_or(stored_file)
}
