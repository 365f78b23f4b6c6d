// Ports - Interface definitions (contracts)

use std::collections::BTreeMap;

use crate::domain::model::{MediaKind, StreamInfo, StreamRef, Timebase};
use crate::error::RemuxResult;

/// A compressed packet owned by the engine until it is written or dropped
pub trait MediaPacket {
    fn stream_index(&self) -> usize;
    fn set_stream_index(&mut self, index: usize);

    fn pts(&self) -> Option<i64>;
    fn set_pts(&mut self, pts: Option<i64>);

    fn dts(&self) -> Option<i64>;
    fn set_dts(&mut self, dts: Option<i64>);

    fn duration(&self) -> i64;
    fn set_duration(&mut self, duration: i64);

    /// Forget the byte position in the source file
    fn clear_position(&mut self) {}
}

/// An opened, demuxed container
pub trait MediaSource {
    type Packet: MediaPacket;

    /// Streams in index order
    fn streams(&self) -> &[StreamInfo];

    /// Top-level container tags
    fn metadata(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Next packet in read order, `None` at end of input
    fn read_packet(&mut self) -> RemuxResult<Option<Self::Packet>>;

    fn stream(&self, index: usize) -> Option<&StreamInfo> {
        self.streams().iter().find(|s| s.index == index)
    }
}

/// An output container being written. Both inputs share one source type.
pub trait MediaSink {
    type Source: MediaSource;

    /// Copy top-level tags from `source`
    fn copy_metadata(&mut self, source: &Self::Source);

    /// Create an output stream with `stream`'s codec parameters, returning its index.
    /// Codec tags are cleared; subtitle streams get the default disposition.
    fn add_stream(&mut self, source: &Self::Source, stream: &StreamInfo) -> RemuxResult<usize>;

    fn write_header(&mut self) -> RemuxResult<()>;

    /// Time base of output stream `index`; only final after the header is written
    fn time_base(&self, index: usize) -> Timebase;

    fn write_packet(&mut self, packet: <Self::Source as MediaSource>::Packet) -> RemuxResult<()>;

    fn write_trailer(&mut self) -> RemuxResult<()>;
}

/// One line of extra detail under a choice, e.g. `("res:", "1920x1080, 23.98 fps")`
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceDetail {
    pub heading: String,
    pub text: String,
}

/// A candidate stream as shown to the operator
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub stream: StreamRef,
    pub heading: String,
    pub subheading: String,
    pub details: Vec<ChoiceDetail>,
}

/// Interactive disambiguation between several candidate streams
pub trait ChoicePrompt {
    /// Returns the chosen positions in `options` (0-based, ascending, unique)
    fn present_choices(&mut self, kind: MediaKind, options: &[ChoiceOption]) -> Vec<usize>;
}
