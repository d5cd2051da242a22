//! The encoded graph format.
//!
//! ```text
//! header   trunk_count x u32 little-endian start addresses
//! nodes    [header byte] [3-byte address entry]* [natural continuation child]
//!
//! header byte
//!   bits 0-4  letter code
//!   bit  5    end of word
//!   bit  6    natural continuation: a child follows the address entries
//!   bit  7    addressed children: address entries follow the header byte
//!
//! address entry
//!   byte 0    address bits 0-7
//!   byte 1    address bits 8-15
//!   byte 2    bits 0-6: address bits 16-22, bit 7: last entry
//! ```
//!
//! Addresses are absolute byte offsets into the same buffer.

/// Mask of the letter code in a node header.
pub const LETTER_BITS: u8 = 0b0001_1111;
/// A word ends at this node.
pub const END_OF_WORD: u8 = 0b0010_0000;
/// A child node follows the address entries without an address of its own.
pub const NATURAL_CONTINUATION: u8 = 0b0100_0000;
/// Address entries follow the node header.
pub const ADDRESSED_CHILDREN: u8 = 0b1000_0000;
/// Set in the third byte of the last address entry of a node.
pub const LAST_ADDRESS: u8 = 0b1000_0000;

/// Size of one address entry.
pub const ADDRESS_SIZE: usize = 3;
/// Size of one trunk directory entry.
pub const TRUNK_ENTRY_SIZE: usize = 4;
/// Number of addressable bytes: node addresses are 23 bits wide.
pub const ADDRESS_SPACE: usize = 1 << 23;

/// Decodes the 23-bit address of the entry at the start of `entry`, and whether it
/// is the node's last entry. Missing bytes read as zero.
#[inline]
pub fn read_address(entry: &[u8]) -> (usize, bool) {
    let byte = |i: usize| entry.get(i).copied().unwrap_or(0);
    let high = byte(2);
    let address = usize::from(byte(0))
        | usize::from(byte(1)) << 8
        | usize::from(high & !LAST_ADDRESS) << 16;
    (address, high & LAST_ADDRESS != 0)
}

/// Encodes a 23-bit address entry. `address` must be below [`ADDRESS_SPACE`].
#[inline]
pub fn write_address(entry: &mut [u8], address: u32, last: bool) {
    debug_assert!((address as usize) < ADDRESS_SPACE);
    entry[0] = address as u8;
    entry[1] = (address >> 8) as u8;
    entry[2] = ((address >> 16) as u8 & !LAST_ADDRESS) | if last { LAST_ADDRESS } else { 0 };
}

/// Reads the start address of `trunk` from the directory, if the slot is inside `data`.
#[inline]
pub fn read_trunk(data: &[u8], trunk: usize) -> Option<usize> {
    let start = trunk.checked_mul(TRUNK_ENTRY_SIZE)?;
    let slot = data.get(start..start.checked_add(TRUNK_ENTRY_SIZE)?)?;
    let address = u32::from_le_bytes([slot[0], slot[1], slot[2], slot[3]]);
    usize::try_from(address).ok()
}

/// Writes the start address of `trunk` into the directory.
#[inline]
pub fn write_trunk(data: &mut [u8], trunk: usize, address: u32) {
    let start = trunk * TRUNK_ENTRY_SIZE;
    data[start..start + TRUNK_ENTRY_SIZE].copy_from_slice(&address.to_le_bytes());
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn address_entry_layout() {
        let mut entry = [0u8; 3];
        write_address(&mut entry, 0x7A_BC_DE, false);
        assert_eq!(entry, [0xDE, 0xBC, 0x7A]);
        assert_eq!(read_address(&entry), (0x7A_BC_DE, false));

        write_address(&mut entry, 0x7A_BC_DE, true);
        assert_eq!(entry, [0xDE, 0xBC, 0xFA]);
        assert_eq!(read_address(&entry), (0x7A_BC_DE, true));
    }

    #[test]
    fn largest_address() {
        let mut entry = [0u8; 3];
        write_address(&mut entry, (ADDRESS_SPACE - 1) as u32, true);
        assert_eq!(read_address(&entry), (ADDRESS_SPACE - 1, true));
    }

    #[test]
    fn truncated_entry_reads_zero() {
        assert_eq!(read_address(&[0x12]), (0x12, false));
    }

    #[test]
    fn trunk_directory() {
        let mut data = vec![0u8; 8];
        write_trunk(&mut data, 1, 0x0102_0304);
        assert_eq!(&data[4..], &[4, 3, 2, 1]);
        assert_eq!(read_trunk(&data, 1), Some(0x0102_0304));
        assert_eq!(read_trunk(&data, 0), Some(0));
        assert_eq!(read_trunk(&data, 2), None);
        assert_eq!(read_trunk(&data, usize::MAX), None);
    }
}
