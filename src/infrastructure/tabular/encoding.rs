// ============================================================
// CSV ENCODINGS
// ============================================================
// Lenient byte-to-text decoding for CSV uploads

use encoding_rs::{DecoderResult, Encoding, UTF_8};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Codec {
    Whatwg(&'static Encoding),
    /// ISO-8859-1: every byte maps to the code point of the same value
    Latin1,
}

/// A text encoding from the configured fallback list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvEncoding {
    label: &'static str,
    codec: Codec,
}

impl CsvEncoding {
    pub const UTF8: CsvEncoding = CsvEncoding {
        label: "utf-8",
        codec: Codec::Whatwg(UTF_8),
    };

    pub const UTF8_SIG: CsvEncoding = CsvEncoding {
        label: "utf-8-sig",
        codec: Codec::Whatwg(UTF_8),
    };

    pub const LATIN1: CsvEncoding = CsvEncoding {
        label: "latin-1",
        codec: Codec::Latin1,
    };

    /// Fallback order used when nothing else is configured
    pub fn defaults() -> Vec<CsvEncoding> {
        vec![Self::UTF8, Self::UTF8_SIG, Self::LATIN1]
    }

    /// Resolve a configured label: `utf-8`, `utf-8-sig`, `latin-1` (true ISO-8859-1),
    /// or any other WHATWG label
    pub fn from_label(label: &str) -> Option<Self> {
        let lowered = label.trim().to_ascii_lowercase();
        match lowered.replace('_', "-").as_str() {
            "utf-8" | "utf8" => Some(Self::UTF8),
            "utf-8-sig" | "utf8-sig" => Some(Self::UTF8_SIG),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "l1" => Some(Self::LATIN1),
            _ => Encoding::for_label(lowered.as_bytes()).map(|encoding| Self {
                label: encoding.name(),
                codec: Codec::Whatwg(encoding),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Decode `bytes`, dropping any byte sequence that is malformed in this encoding.
    /// A leading byte-order mark is removed.
    pub fn decode_lossy(&self, bytes: &[u8]) -> String {
        match self.codec {
            Codec::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Codec::Whatwg(encoding) => decode_whatwg(encoding, bytes),
        }
    }
}

fn decode_whatwg(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let mut decoder = encoding.new_decoder_with_bom_removal();
    let mut out = String::with_capacity(
        decoder
            .max_utf8_buffer_length_without_replacement(bytes.len())
            .unwrap_or(bytes.len()),
    );

    let mut input = bytes;
    loop {
        let (result, read) =
            decoder.decode_to_string_without_replacement(input, &mut out, true);
        input = &input[read..];
        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::Malformed(_, _) => continue,
            DecoderResult::OutputFull => {
                let needed = decoder
                    .max_utf8_buffer_length_without_replacement(input.len())
                    .unwrap_or(input.len())
                    .max(4);
                out.reserve(needed);
            }
        }
    }

    out
}
