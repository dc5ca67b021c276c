use tracing::trace;

use crate::nal::ebsp_to_rbsp;
use crate::parser::{parse_slice_segment_header, BitstreamParser, NalUnitPayload, ParserState};
use crate::rtp::RtpPacket;
use crate::slice::SliceSegmentHeader;

/// SliceQpY, Equation 7-54.
fn slice_qp_y(init_qp_minus26: i32, header: &SliceSegmentHeader) -> i32 {
    26 + init_qp_minus26 + header.slice_qp_delta
}

/// Parses an Annex B byte stream and returns the luma slice QP of every
/// slice whose PPS resolves, in stream order. Slices without a resolvable
/// PPS are skipped, as are NAL units that fail to parse.
pub fn get_slice_qp_y(data: &[u8], state: &mut ParserState) -> Vec<i32> {
    let mut qps = Vec::new();

    for result in BitstreamParser::parse(data, state) {
        let Ok(nal) = result else { continue };
        let NalUnitPayload::SliceSegment(ref header) = nal.payload else {
            continue;
        };
        let Some(pps) = state.get_pps(header.slice_pic_parameter_set_id) else {
            continue;
        };
        let qp = slice_qp_y(pps.init_qp_minus26, header);
        trace!(qp, "slice QP");
        qps.push(qp);
    }

    qps
}

/// Luma slice QP carried by one RTP payload (RFC 7798). An aggregation
/// packet contributes its last contained NAL unit; a fragmentation unit
/// contributes only when its start bit is set. Returns `None` when the
/// packet holds no slice or its PPS is absent from `state`.
pub fn get_slice_qp_y_rtp(packet: &[u8], state: &ParserState) -> Option<i32> {
    let packet = RtpPacket::parse(packet).ok()?;
    let nal = packet.latest_nal()?;

    let header = crate::nal::NalHeader::parse(&nal).ok()?;
    if !header.nal_unit_type.is_slice_segment() {
        return None;
    }

    let rbsp = ebsp_to_rbsp(&nal[2..]);
    let slice_header = parse_slice_segment_header(&rbsp, header.nal_unit_type, state).ok()?;
    let pps = state.get_pps(slice_header.slice_pic_parameter_set_id)?;

    Some(slice_qp_y(pps.init_qp_minus26, &slice_header))
}
