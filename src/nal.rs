use crate::bitreader::BitReader;
use crate::{Error, Result};

/// NAL unit types from ITU-T H.265 Table 7-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NalUnitType {
    TrailN,
    TrailR,
    TsaN,
    TsaR,
    StsaN,
    StsaR,
    RadlN,
    RadlR,
    RaslN,
    RaslR,
    BlaWLp,
    BlaWRadl,
    BlaNLp,
    IdrWRadl,
    IdrNLp,
    CraNut,
    Vps,
    Sps,
    Pps,
    Aud,
    EndOfSeq,
    EndOfBitstream,
    FillerData,
    PrefixSei,
    SuffixSei,
    ReservedVcl(u8),
    ReservedNonVcl(u8),
    Unspecified(u8),
}

impl NalUnitType {
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::TrailN => 0,
            Self::TrailR => 1,
            Self::TsaN => 2,
            Self::TsaR => 3,
            Self::StsaN => 4,
            Self::StsaR => 5,
            Self::RadlN => 6,
            Self::RadlR => 7,
            Self::RaslN => 8,
            Self::RaslR => 9,
            Self::BlaWLp => 16,
            Self::BlaWRadl => 17,
            Self::BlaNLp => 18,
            Self::IdrWRadl => 19,
            Self::IdrNLp => 20,
            Self::CraNut => 21,
            Self::Vps => 32,
            Self::Sps => 33,
            Self::Pps => 34,
            Self::Aud => 35,
            Self::EndOfSeq => 36,
            Self::EndOfBitstream => 37,
            Self::FillerData => 38,
            Self::PrefixSei => 39,
            Self::SuffixSei => 40,
            Self::ReservedVcl(v) => *v,
            Self::ReservedNonVcl(v) => *v,
            Self::Unspecified(v) => *v,
        }
    }

    /// True for coded slice segment NAL units (types 0-9 and 16-21).
    pub fn is_slice_segment(&self) -> bool {
        matches!(
            self,
            Self::TrailN
                | Self::TrailR
                | Self::TsaN
                | Self::TsaR
                | Self::StsaN
                | Self::StsaR
                | Self::RadlN
                | Self::RadlR
                | Self::RaslN
                | Self::RaslR
                | Self::BlaWLp
                | Self::BlaWRadl
                | Self::BlaNLp
                | Self::IdrWRadl
                | Self::IdrNLp
                | Self::CraNut
        )
    }

    pub fn is_vcl(&self) -> bool {
        self.as_u8() <= 31
    }

    /// Intra random access point picture (BLA, IDR, CRA and reserved IRAP).
    pub fn is_irap(&self) -> bool {
        (16..=23).contains(&self.as_u8())
    }

    pub fn is_idr(&self) -> bool {
        matches!(self, Self::IdrWRadl | Self::IdrNLp)
    }
}

impl From<u8> for NalUnitType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::TrailN,
            1 => Self::TrailR,
            2 => Self::TsaN,
            3 => Self::TsaR,
            4 => Self::StsaN,
            5 => Self::StsaR,
            6 => Self::RadlN,
            7 => Self::RadlR,
            8 => Self::RaslN,
            9 => Self::RaslR,
            16 => Self::BlaWLp,
            17 => Self::BlaWRadl,
            18 => Self::BlaNLp,
            19 => Self::IdrWRadl,
            20 => Self::IdrNLp,
            21 => Self::CraNut,
            32 => Self::Vps,
            33 => Self::Sps,
            34 => Self::Pps,
            35 => Self::Aud,
            36 => Self::EndOfSeq,
            37 => Self::EndOfBitstream,
            38 => Self::FillerData,
            39 => Self::PrefixSei,
            40 => Self::SuffixSei,
            10..=15 | 22..=31 => Self::ReservedVcl(value),
            41..=47 => Self::ReservedNonVcl(value),
            _ => Self::Unspecified(value & 0x3f),
        }
    }
}

/// Two-byte NAL unit header (7.3.1.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NalHeader {
    pub nal_unit_type: NalUnitType,
    pub nuh_layer_id: u8,
    pub nuh_temporal_id_plus1: u8,
}

impl NalHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 2 {
            return Err(Error::InvalidNalHeader);
        }

        let mut reader = BitReader::new(data);
        Self::parse_bits(&mut reader)
    }

    pub fn parse_bits(reader: &mut BitReader) -> Result<Self> {
        let forbidden_zero_bit = reader.read_bit().map_err(|_| Error::InvalidNalHeader)?;
        if forbidden_zero_bit {
            return Err(Error::InvalidNalHeader);
        }

        let nal_unit_type = reader.read_bits(6).map_err(|_| Error::InvalidNalHeader)? as u8;
        let nuh_layer_id = reader.read_bits(6).map_err(|_| Error::InvalidNalHeader)? as u8;
        let nuh_temporal_id_plus1 = reader.read_bits(3).map_err(|_| Error::InvalidNalHeader)? as u8;
        if nuh_temporal_id_plus1 == 0 {
            return Err(Error::InvalidNalHeader);
        }

        Ok(NalHeader {
            nal_unit_type: NalUnitType::from(nal_unit_type),
            nuh_layer_id,
            nuh_temporal_id_plus1,
        })
    }

    pub fn temporal_id(&self) -> u8 {
        self.nuh_temporal_id_plus1 - 1
    }
}

/// One framed NAL unit: header plus the emulation-protected payload bytes.
#[derive(Debug, Clone)]
pub struct Nal {
    pub start_code_len: u8,
    pub header: NalHeader,
    pub ebsp: Vec<u8>,
}

impl Nal {
    pub fn parse(start_code_len: u8, data: &[u8]) -> Result<Self> {
        let header = NalHeader::parse(data)?;

        Ok(Nal {
            start_code_len,
            header,
            ebsp: data[2..].to_vec(),
        })
    }

    pub fn to_rbsp(&self) -> Vec<u8> {
        ebsp_to_rbsp(&self.ebsp)
    }

    pub fn is_slice_segment(&self) -> bool {
        self.header.nal_unit_type.is_slice_segment()
    }
}

pub fn ebsp_to_rbsp(ebsp: &[u8]) -> Vec<u8> {
    let mut rbsp = Vec::with_capacity(ebsp.len());
    let mut i = 0;

    while i < ebsp.len() {
        if i + 2 < ebsp.len() && ebsp[i] == 0x00 && ebsp[i + 1] == 0x00 && ebsp[i + 2] == 0x03 {
            rbsp.push(0x00);
            rbsp.push(0x00);
            i += 3;
        } else {
            rbsp.push(ebsp[i]);
            i += 1;
        }
    }

    rbsp
}

pub fn rbsp_to_ebsp(rbsp: &[u8]) -> Vec<u8> {
    let mut ebsp = Vec::with_capacity(rbsp.len() + rbsp.len() / 3);
    let mut zero_count = 0;

    for &byte in rbsp {
        if zero_count == 2 && byte <= 0x03 {
            ebsp.push(0x03);
            zero_count = 0;
        }

        ebsp.push(byte);

        if byte == 0x00 {
            zero_count += 1;
        } else {
            zero_count = 0;
        }
    }

    ebsp
}
