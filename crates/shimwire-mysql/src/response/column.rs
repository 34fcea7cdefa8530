//! Column definitions for synthesized result sets.

use shimwire_core::Result;

use crate::config::LengthOverflow;
use crate::protocol::{
    COLUMN_FIXED_FIELDS_LEN, PacketSequence, PacketWriter, charset, column_flags, column_type,
};

/// Maximum display length advertised for every synthesized column.
pub const COLUMN_LENGTH: u32 = 0x0002_FFFD;

/// Write `s` as a short length-encoded string, honouring the overflow policy.
pub(crate) fn write_lenenc(
    writer: &mut PacketWriter,
    s: &str,
    overflow: LengthOverflow,
) -> Result<()> {
    if overflow.is_reject() {
        writer.try_write_short_lenenc_string(s)
    } else {
        writer.write_short_lenenc_string(s);
        Ok(())
    }
}

/// Build one framed column definition packet.
///
/// There is no backend table behind a synthesized result, so the physical
/// table and column names repeat the display names. Every column is typed
/// as a utf8 BLOB since keys and values have no length or content bound.
pub fn column_definition(
    seq: &mut PacketSequence,
    schema: &str,
    table: &str,
    column: &str,
    overflow: LengthOverflow,
) -> Result<Vec<u8>> {
    let mut writer = PacketWriter::with_capacity(
        32 + schema.len() + 2 * table.len() + 2 * column.len(),
    );

    write_lenenc(&mut writer, "def", overflow)?;
    write_lenenc(&mut writer, schema, overflow)?;
    write_lenenc(&mut writer, table, overflow)?;
    write_lenenc(&mut writer, table, overflow)?;
    write_lenenc(&mut writer, column, overflow)?;
    write_lenenc(&mut writer, column, overflow)?;

    writer.write_u8(COLUMN_FIXED_FIELDS_LEN);
    writer.write_u16_le(u16::from(charset::UTF8_GENERAL_CI));
    writer.write_u32_le(COLUMN_LENGTH);
    writer.write_u8(column_type::MYSQL_TYPE_BLOB);
    writer.write_u16_le(column_flags::BLOB_FLAG);
    // decimals
    writer.write_u8(0);
    // filler
    writer.write_u16_le(0);

    Ok(seq.frame(writer.as_bytes()))
}
