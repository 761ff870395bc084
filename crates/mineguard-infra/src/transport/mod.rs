//! Outbound wire format and TCP framing

mod batch_codec;
mod frame_sink;

pub use batch_codec::{decode_batch, encode_batch, Record};
pub use frame_sink::{read_frame, write_frame, FrameSink, MAX_FRAME_LEN};
