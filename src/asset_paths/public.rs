/// Produce the public reference under which an activated asset is served.
///
/// The reference always joins prefix and file name with exactly one forward slash, so a
/// configured prefix of `/gifs`, `/gifs/` or `gifs` yields the same shape of reference.
pub fn make_public_ref(public_prefix: &str, stored_file: &str) -> String {
  let prefix = public_prefix.trim_end_matches('/');
  let file = stored_file.trim_start_matches('/');
  if prefix.is_empty() {
    format!("/{file}")
  } else if prefix.starts_with('/') {
    format!("{prefix}/{file}")
  } else {
    format!("/{prefix}/{file}")
  }
}
