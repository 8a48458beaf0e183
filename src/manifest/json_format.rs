//! Pretty JSON output that escapes every non-ASCII character.
//!
//! Manifests written by other tooling escape non-ASCII text as `\uXXXX`; emitting the same
//! form keeps untouched entries byte-identical across a save.

use std::io;

use serde_json::ser::{Formatter, PrettyFormatter};

/// Two-space pretty printer writing non-ASCII characters as `\u` escapes.
pub(crate) struct AsciiPrettyFormatter<'a> {
  pretty: PrettyFormatter<'a>,
}

impl AsciiPrettyFormatter<'_> {
  pub(crate) fn new() -> Self {
    Self {
      pretty: PrettyFormatter::with_indent(b"  "),
    }
  }
}

impl Formatter for AsciiPrettyFormatter<'_> {
  fn write_string_fragment<W: ?Sized + io::Write>(
    &mut self,
    writer: &mut W,
    fragment: &str,
  ) -> io::Result<()> {
    let mut start = 0;
    for (index, ch) in fragment.char_indices() {
      if ch.is_ascii() {
        continue;
      }
      writer.write_all(&fragment.as_bytes()[start..index])?;
      let mut units = [0u16; 2];
      for unit in ch.encode_utf16(&mut units) {
        write!(writer, "\\u{unit:04x}")?;
      }
      start = index + ch.len_utf8();
    }
    writer.write_all(&fragment.as_bytes()[start..])
  }

  fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
    self.pretty.begin_array(writer)
  }

  fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
    self.pretty.end_array(writer)
  }

  fn begin_array_value<W: ?Sized + io::Write>(
    &mut self,
    writer: &mut W,
    first: bool,
  ) -> io::Result<()> {
    self.pretty.begin_array_value(writer, first)
  }

  fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
    self.pretty.end_array_value(writer)
  }

  fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
    self.pretty.begin_object(writer)
  }

  fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
    self.pretty.end_object(writer)
  }

  fn begin_object_key<W: ?Sized + io::Write>(
    &mut self,
    writer: &mut W,
    first: bool,
  ) -> io::Result<()> {
    self.pretty.begin_object_key(writer, first)
  }

  fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
    self.pretty.begin_object_value(writer)
  }

  fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
    self.pretty.end_object_value(writer)
  }
}
