use std::io::{self, Write};

pub fn write_line(writer: &mut dyn Write, content: impl AsRef<[u8]>) -> io::Result<()> {
    writer.write_all(content.as_ref())?;
    writer.write_all(b"\n")
}
