use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::bitreader::BitReader;
use crate::bytescan::{find_nalu_indices, NaluSpan};
use crate::nal::{ebsp_to_rbsp, NalHeader, NalUnitType};
use crate::pps::Pps;
use crate::slice::SliceSegmentHeader;
use crate::sps::Sps;
use crate::vps::Vps;
use crate::{eg, Error, Result};

/// Active parameter sets, keyed by their ids. Writes happen only after a
/// parameter set parses completely; getters hand out `Arc` snapshots so a
/// slice parse keeps a stable view even if the entry is replaced later.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    vps_map: HashMap<u32, Arc<Vps>>,
    sps_map: HashMap<u32, Arc<Sps>>,
    pps_map: HashMap<u32, Arc<Pps>>,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_vps(&self, id: u32) -> Option<Arc<Vps>> {
        self.vps_map.get(&id).cloned()
    }

    pub fn get_sps(&self, id: u32) -> Option<Arc<Sps>> {
        self.sps_map.get(&id).cloned()
    }

    pub fn get_pps(&self, id: u32) -> Option<Arc<Pps>> {
        self.pps_map.get(&id).cloned()
    }

    fn put_vps(&mut self, vps: Vps) -> Arc<Vps> {
        let vps = Arc::new(vps);
        self.vps_map.insert(vps.vps_video_parameter_set_id, vps.clone());
        vps
    }

    fn put_sps(&mut self, sps: Sps) -> Arc<Sps> {
        let sps = Arc::new(sps);
        self.sps_map.insert(sps.sps_seq_parameter_set_id, sps.clone());
        sps
    }

    fn put_pps(&mut self, pps: Pps) -> Arc<Pps> {
        let pps = Arc::new(pps);
        self.pps_map.insert(pps.pps_pic_parameter_set_id, pps.clone());
        pps
    }
}

/// Payload of one parsed NAL unit.
#[derive(Debug, Clone)]
pub enum NalUnitPayload {
    Vps(Arc<Vps>),
    Sps(Arc<Sps>),
    Pps(Arc<Pps>),
    SliceSegment(SliceSegmentHeader),
    Aud { pic_type: u8 },
    EndOfSeq,
    EndOfBitstream,
    FillerData,
    Sei(Vec<u8>),
    Opaque(Vec<u8>),
}

/// One parsed NAL unit with its location in the byte stream.
#[derive(Debug, Clone)]
pub struct NalUnit {
    pub span: NaluSpan,
    pub header: NalHeader,
    pub payload: NalUnitPayload,
}

pub struct BitstreamParser;

impl BitstreamParser {
    /// Parses an Annex B byte stream. NAL units are handled in stream
    /// order; parameter sets update `state` as they are parsed so later
    /// slices resolve against them. A NAL unit that fails to parse is
    /// recorded as an error at its index and does not stop the stream or
    /// touch `state`.
    pub fn parse(data: &[u8], state: &mut ParserState) -> Vec<Result<NalUnit>> {
        let mut results = Vec::new();

        for span in find_nalu_indices(data) {
            let payload =
                &data[span.payload_start_offset..span.payload_start_offset + span.payload_size];
            trace!(
                start_offset = span.start_offset,
                payload_size = span.payload_size,
                "framed NAL unit"
            );

            let result = Self::parse_nal_unit(payload, &span, state);
            if let Err(ref e) = result {
                warn!(start_offset = span.start_offset, error = %e, "skipping NAL unit");
            }
            results.push(result);
        }

        results
    }

    /// Parses one NAL unit payload (header byte onward, still with
    /// emulation prevention bytes).
    pub fn parse_nal_unit(
        payload: &[u8],
        span: &NaluSpan,
        state: &mut ParserState,
    ) -> Result<NalUnit> {
        let header = NalHeader::parse(payload)?;
        let ebsp = &payload[2..];

        let payload = match header.nal_unit_type {
            NalUnitType::Vps => {
                let vps = Vps::parse(&ebsp_to_rbsp(ebsp))?;
                debug!(id = vps.vps_video_parameter_set_id, "parsed VPS");
                NalUnitPayload::Vps(state.put_vps(vps))
            }
            NalUnitType::Sps => {
                let sps = Sps::parse(&ebsp_to_rbsp(ebsp))?;
                debug!(id = sps.sps_seq_parameter_set_id, "parsed SPS");
                NalUnitPayload::Sps(state.put_sps(sps))
            }
            NalUnitType::Pps => {
                let pps = Pps::parse(&ebsp_to_rbsp(ebsp))?;
                debug!(id = pps.pps_pic_parameter_set_id, "parsed PPS");
                NalUnitPayload::Pps(state.put_pps(pps))
            }
            t if t.is_slice_segment() => {
                let rbsp = ebsp_to_rbsp(ebsp);
                let slice_header = parse_slice_segment_header(&rbsp, header.nal_unit_type, state)?;
                NalUnitPayload::SliceSegment(slice_header)
            }
            NalUnitType::Aud => {
                let rbsp = ebsp_to_rbsp(ebsp);
                let mut reader = BitReader::new(&rbsp);
                let pic_type = reader.read_bits(3)? as u8;
                reader.rbsp_trailing_bits()?;
                NalUnitPayload::Aud { pic_type }
            }
            NalUnitType::EndOfSeq => NalUnitPayload::EndOfSeq,
            NalUnitType::EndOfBitstream => NalUnitPayload::EndOfBitstream,
            NalUnitType::FillerData => NalUnitPayload::FillerData,
            NalUnitType::PrefixSei | NalUnitType::SuffixSei => {
                NalUnitPayload::Sei(ebsp_to_rbsp(ebsp))
            }
            _ => NalUnitPayload::Opaque(ebsp.to_vec()),
        };

        Ok(NalUnit {
            span: span.clone(),
            header,
            payload,
        })
    }
}

/// Resolves the PPS (and transitively the SPS) referenced by a slice
/// segment header, then parses the full header against them.
pub(crate) fn parse_slice_segment_header(
    rbsp: &[u8],
    nal_unit_type: NalUnitType,
    state: &ParserState,
) -> Result<SliceSegmentHeader> {
    let pps_id = peek_slice_pps_id(rbsp, nal_unit_type)?;
    let pps = state.get_pps(pps_id).ok_or(Error::MissingPps(pps_id))?;
    let sps = state
        .get_sps(pps.pps_seq_parameter_set_id)
        .ok_or(Error::MissingSps(pps.pps_seq_parameter_set_id))?;

    SliceSegmentHeader::parse(rbsp, nal_unit_type, &sps, &pps)
}

/// Reads just far enough into a slice segment header to learn its PPS id.
fn peek_slice_pps_id(rbsp: &[u8], nal_unit_type: NalUnitType) -> Result<u32> {
    let mut reader = BitReader::new(rbsp);

    let _first_slice_segment_in_pic_flag = reader.read_flag()?;
    if nal_unit_type.is_irap() {
        let _no_output_of_prior_pics_flag = reader.read_flag()?;
    }
    let pps_id = eg::read_ue(&mut reader)?;
    crate::range_check("slice_pic_parameter_set_id", pps_id as i64, 0, 63)?;

    Ok(pps_id)
}
