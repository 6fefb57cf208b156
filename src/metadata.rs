//! The read-only metadata line: `(<w>, <h>) {"top": .., "left": .., "width": .., "height": ..}`.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::selection_logic::Region;

/// Compact JSON with a space after `,` and `:`, the layout scripts downstream
/// already parse.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn region_json(region: &Region) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, SpacedFormatter);
    region.serialize(&mut ser)?;
    // serde_json only ever writes UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn format_metadata(screen: (u32, u32), region: &Region) -> serde_json::Result<String> {
    Ok(format!("({}, {}) {}", screen.0, screen.1, region_json(region)?))
}
