/// Determine whether a stored file name is a single plain path component.
///
/// Stored names are joined onto the served directory and the source root, so anything
/// that could escape those directories is rejected when the manifest is loaded.
pub fn is_plain_file_name(value: &str) -> bool {
  !value.is_empty()
    && value != "."
    && value != ".."
    && !value.contains('/')
    && !value.contains('\\')
    && !value.contains('\0')
}
