pub mod bitreader;
pub mod bytescan;
pub mod eg;
pub mod hrd;
pub mod nal;
pub mod parser;
pub mod pps;
pub mod pps_ext;
pub mod ptl;
pub mod qp;
pub mod rps;
pub mod rtp;
pub mod scaling;
pub mod slice;
pub mod sps;
pub mod sps_ext;
pub mod vps;
pub mod vui;

#[cfg(test)]
pub(crate) mod testutil;

pub use bytescan::{find_nalu_indices, NaluSpan, StartCodeScanner};
pub use nal::{Nal, NalHeader, NalUnitType};
pub use parser::{BitstreamParser, NalUnit, NalUnitPayload, ParserState};
pub use pps::Pps;
pub use qp::get_slice_qp_y;
pub use slice::SliceSegmentHeader;
pub use sps::Sps;
pub use vps::Vps;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("Unexpected end of bitstream")]
    UnexpectedEof,
    #[error("{field} value {value} out of range [{min}, {max}]")]
    SyntaxViolation {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("Invalid NAL header")]
    InvalidNalHeader,
    #[error("No start code found")]
    InvalidStartCode,
    #[error("Missing rbsp_stop_one_bit")]
    RbspTrailingBits,
    #[error("Missing VPS with id {0}")]
    MissingVps(u32),
    #[error("Missing SPS with id {0}")]
    MissingSps(u32),
    #[error("Missing PPS with id {0}")]
    MissingPps(u32),
    #[error("Bitstream error: {0}")]
    BitstreamError(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn range_check(field: &'static str, value: i64, min: i64, max: i64) -> Result<()> {
    if value < min || value > max {
        return Err(Error::SyntaxViolation {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
