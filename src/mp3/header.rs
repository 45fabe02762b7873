// MPEG audio frame header decoding
//
// A frame header is one big-endian 32-bit word:
// - bits 31-21: frame sync (all ones)
// - bits 20-19: MPEG version (00 = 2.5, 10 = 2, 11 = 1, 01 reserved)
// - bits 18-17: layer (01 = III, 10 = II, 11 = I, 00 reserved)
// - bit  16:    protection
// - bits 15-12: bitrate index
// - bits 11-10: sample rate index
// - bit  9:     padding

/// MPEG audio version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    V1,
    V2,
    V2_5,
}

impl MpegVersion {
    fn rate_row(self) -> usize {
        match self {
            MpegVersion::V1 => 0,
            MpegVersion::V2 => 1,
            MpegVersion::V2_5 => 2,
        }
    }
}

/// MPEG audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Layer1,
    Layer2,
    Layer3,
}

impl Layer {
    fn bitrate_row(self) -> usize {
        match self {
            Layer::Layer1 => 0,
            Layer::Layer2 => 1,
            Layer::Layer3 => 2,
        }
    }
}

// Bitrates in kbps, indexed by [version group][layer][bitrate index].
// Index 0 (free format) and index 15 (reserved) map to zero = unsupported.
const BITRATES: [[[u32; 16]; 3]; 2] = [
    // MPEG Version 1
    [
        [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 0], // Layer I
        [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384, 0],    // Layer II
        [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0],     // Layer III
    ],
    // MPEG Version 2 & 2.5
    [
        [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256, 0],
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0],
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0],
    ],
];

// Sample rates in Hz, indexed by [version][sample rate index]; index 3 reserved
const SAMPLE_RATES: [[u32; 4]; 3] = [
    [44100, 48000, 32000, 0], // MPEG 1
    [22050, 24000, 16000, 0], // MPEG 2
    [11025, 12000, 8000, 0],  // MPEG 2.5
];

// 11 set bits, byte aligned
const FRAME_SYNC_MASK: u32 = 0xFFE0_0000;

/// One decoded MPEG audio frame header
#[derive(Debug, Clone, Copy)]
pub struct FrameHeader {
    pub version: MpegVersion,
    pub layer: Layer,
    pub protection: bool,
    /// Bitrate in bits per second
    pub bitrate: u32,
    pub sample_rate: u32,
    pub padding: bool,
    /// Whole frame length in bytes, header included
    pub frame_size: u32,
}

impl FrameHeader {
    /// Decode a candidate 4-byte header word.
    ///
    /// Returns `None` for anything that is not a usable audio frame header:
    /// missing sync, reserved version/layer bits, zero bitrate or sample rate
    /// lookups, or a computed frame size of zero.
    pub fn parse(word: u32) -> Option<Self> {
        if word & FRAME_SYNC_MASK != FRAME_SYNC_MASK {
            return None;
        }

        let version = match (word >> 19) & 0b11 {
            0b00 => MpegVersion::V2_5,
            0b10 => MpegVersion::V2,
            0b11 => MpegVersion::V1,
            _ => return None,
        };

        let layer = match (word >> 17) & 0b11 {
            0b01 => Layer::Layer3,
            0b10 => Layer::Layer2,
            0b11 => Layer::Layer1,
            _ => return None,
        };

        let protection = (word >> 16) & 1 == 1;

        let version_group = if version == MpegVersion::V1 { 0 } else { 1 };
        let bitrate_index = ((word >> 12) & 0xF) as usize;
        let bitrate = BITRATES[version_group][layer.bitrate_row()][bitrate_index] * 1000;
        if bitrate == 0 {
            return None;
        }

        let rate_index = ((word >> 10) & 0b11) as usize;
        let sample_rate = SAMPLE_RATES[version.rate_row()][rate_index];
        if sample_rate == 0 {
            return None;
        }

        let padding = (word >> 9) & 1 == 1;
        let pad_len = u32::from(padding);

        let frame_size = match layer {
            Layer::Layer1 => (12 * bitrate / sample_rate + pad_len) * 4,
            _ => 144 * bitrate / sample_rate + pad_len,
        };
        if frame_size == 0 {
            return None;
        }

        Some(FrameHeader {
            version,
            layer,
            protection,
            bitrate,
            sample_rate,
            padding,
            frame_size,
        })
    }

    /// PCM samples carried by one frame
    pub fn samples_per_frame(&self) -> u64 {
        match (self.layer, self.version) {
            (Layer::Layer1, _) => 384,
            (_, MpegVersion::V1) => 1152,
            _ => 576,
        }
    }
}
