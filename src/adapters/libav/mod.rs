// LibAV adapter - Container demuxing and muxing through ffmpeg-next

use std::collections::BTreeMap;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};

use ffmpeg_next as ffmpeg;
use ffmpeg::codec::{self, Parameters};
use ffmpeg::format::context::{Input, Output};
use ffmpeg::format::stream::Disposition;
use ffmpeg::format::{self, Sample};
use ffmpeg::media::Type;
use ffmpeg::{Packet, Rational, Stream};
use tracing::debug;

use crate::domain::model::{AudioParams, MediaKind, StreamInfo, Timebase, VideoParams};
use crate::engine::OUTPUT_FORMAT;
use crate::error::{RemuxError, RemuxResult};
use crate::ports::{MediaPacket, MediaSink, MediaSource};

/// Consecutive read failures tolerated before giving up on a source
const MAX_READ_FAILURES: usize = 32;

fn to_timebase(rational: Rational) -> Timebase {
    Timebase::new(rational.numerator(), rational.denominator())
}

fn to_kind(medium: Type) -> MediaKind {
    match medium {
        Type::Video => MediaKind::Video,
        Type::Audio => MediaKind::Audio,
        Type::Subtitle => MediaKind::Subtitle,
        Type::Attachment => MediaKind::Attachment,
        Type::Data => MediaKind::Data,
        Type::Unknown => MediaKind::Unknown,
    }
}

fn dictionary_to_map<'a>(entries: impl Iterator<Item = (&'a str, &'a str)>) -> BTreeMap<String, String> {
    entries.map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Human-readable channel layout, e.g. `5.1(side)`
fn channel_layout_name(params: &Parameters) -> Option<String> {
    let mut buf = [0 as c_char; 64];
    let written = unsafe {
        ffmpeg::ffi::av_channel_layout_describe(&(*params.as_ptr()).ch_layout, buf.as_mut_ptr(), buf.len())
    };
    if written <= 0 {
        return None;
    }
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Some(name.to_string_lossy().into_owned())
}

/// Sample format name from `codecpar->format`, e.g. `fltp`
fn sample_format_name(format: i32) -> Option<String> {
    if format < 0 || format >= ffmpeg::ffi::AVSampleFormat::AV_SAMPLE_FMT_NB as i32 {
        return None;
    }
    let raw: ffmpeg::ffi::AVSampleFormat = unsafe { std::mem::transmute(format) };
    let sample = Sample::from(raw);
    if sample == Sample::None {
        return None;
    }
    Some(sample.name().to_string())
}

fn describe_stream(stream: &Stream, container_duration: i64) -> StreamInfo {
    let params = stream.parameters();
    let kind = to_kind(params.medium());
    let time_base = to_timebase(stream.time_base());

    let mut info = StreamInfo::new(stream.index(), kind, params.id().name(), time_base);
    info.metadata = dictionary_to_map(stream.metadata().iter());
    info.default_disposition = stream.disposition().contains(Disposition::DEFAULT);

    info.duration = if stream.duration() != ffmpeg::ffi::AV_NOPTS_VALUE {
        Some(time_base.ts_to_seconds(stream.duration()))
    } else if container_duration > 0 {
        Some(container_duration as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE))
    } else {
        None
    };

    let raw = unsafe { &*params.as_ptr() };
    info.bit_rate = u64::try_from(raw.bit_rate).ok().filter(|&b| b > 0);

    match kind {
        MediaKind::Video => {
            let rate = stream.rate();
            info.video = Some(VideoParams {
                width: raw.width.max(0) as u32,
                height: raw.height.max(0) as u32,
                frame_rate: if rate.denominator() != 0 { f64::from(rate) } else { 0.0 },
            });
        }
        MediaKind::Audio => {
            info.audio = Some(AudioParams {
                sample_rate: raw.sample_rate.max(0) as u32,
                channels: raw.ch_layout.nb_channels.max(0) as u32,
                channel_layout: channel_layout_name(&params),
                sample_format: sample_format_name(raw.format),
                bits_per_sample: raw.bits_per_raw_sample.max(0) as u32,
            });
        }
        _ => {}
    }

    info
}

/// An opened input container
pub struct LibavSource {
    path: PathBuf,
    input: Input,
    streams: Vec<StreamInfo>,
}

impl LibavSource {
    /// Open `path` and read its stream information
    pub fn open(path: &Path) -> RemuxResult<Self> {
        let input = format::input(&path).map_err(|e| RemuxError::InputOpen {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let container_duration = input.duration();
        let streams = input
            .streams()
            .map(|stream| describe_stream(&stream, container_duration))
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            input,
            streams,
        })
    }
}

impl MediaSource for LibavSource {
    type Packet = Packet;

    fn streams(&self) -> &[StreamInfo] {
        &self.streams
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        dictionary_to_map(self.input.metadata().iter())
    }

    fn read_packet(&mut self) -> RemuxResult<Option<Packet>> {
        let mut failures = 0;
        loop {
            let mut packet = Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => return Ok(Some(packet)),
                Err(ffmpeg::Error::Eof) => return Ok(None),
                Err(e) => {
                    failures += 1;
                    if failures >= MAX_READ_FAILURES {
                        return Err(e.into());
                    }
                    debug!("read error in '{}': {}", self.path.display(), e);
                }
            }
        }
    }
}

impl MediaPacket for Packet {
    fn stream_index(&self) -> usize {
        self.stream()
    }

    fn set_stream_index(&mut self, index: usize) {
        self.set_stream(index);
    }

    fn pts(&self) -> Option<i64> {
        Packet::pts(self)
    }

    fn set_pts(&mut self, pts: Option<i64>) {
        Packet::set_pts(self, pts);
    }

    fn dts(&self) -> Option<i64> {
        Packet::dts(self)
    }

    fn set_dts(&mut self, dts: Option<i64>) {
        Packet::set_dts(self, dts);
    }

    fn duration(&self) -> i64 {
        Packet::duration(self)
    }

    fn set_duration(&mut self, duration: i64) {
        Packet::set_duration(self, duration);
    }

    fn clear_position(&mut self) {
        self.set_position(-1);
    }
}

/// An output Matroska container. Dropping it closes the file and frees the context.
pub struct LibavSink {
    output: Output,
}

impl LibavSink {
    /// Allocate the output context and open `path` for writing
    pub fn create(path: &Path) -> RemuxResult<Self> {
        let output = format::output_as(&path, OUTPUT_FORMAT).map_err(|e| RemuxError::OutputAlloc {
            message: format!("{}: {}", path.display(), e),
        })?;
        Ok(Self { output })
    }
}

impl MediaSink for LibavSink {
    type Source = LibavSource;

    fn copy_metadata(&mut self, source: &LibavSource) {
        self.output.set_metadata(source.input.metadata().to_owned());
    }

    fn add_stream(&mut self, source: &LibavSource, info: &StreamInfo) -> RemuxResult<usize> {
        let input = source.input.stream(info.index).ok_or_else(|| RemuxError::StreamCreate {
            message: format!("input stream {} not found", info.index),
        })?;

        let mut output = self
            .output
            .add_stream(ffmpeg::encoder::find(codec::Id::None))
            .map_err(|e| RemuxError::StreamCreate { message: e.to_string() })?;

        output.set_parameters(input.parameters());
        output.set_metadata(input.metadata().to_owned());
        unsafe {
            (*output.parameters().as_mut_ptr()).codec_tag = 0;
            let raw = output.as_mut_ptr();
            (*raw).start_time = (*input.as_ptr()).start_time;
            if info.kind == MediaKind::Subtitle {
                (*raw).disposition |= ffmpeg::ffi::AV_DISPOSITION_DEFAULT as i32;
            }
        }

        Ok(output.index())
    }

    fn write_header(&mut self) -> RemuxResult<()> {
        self.output
            .write_header()
            .map_err(|e| RemuxError::HeaderWrite { message: e.to_string() })
    }

    fn time_base(&self, index: usize) -> Timebase {
        self.output
            .stream(index)
            .map(|s| to_timebase(s.time_base()))
            .unwrap_or_else(Timebase::millis)
    }

    fn write_packet(&mut self, packet: Packet) -> RemuxResult<()> {
        packet
            .write_interleaved(&mut self.output)
            .map_err(|e| RemuxError::PacketWrite { message: e.to_string() })
    }

    fn write_trailer(&mut self) -> RemuxResult<()> {
        self.output
            .write_trailer()
            .map_err(|e| RemuxError::TrailerWrite { message: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_format_name() {
        let fltp = ffmpeg::ffi::AVSampleFormat::AV_SAMPLE_FMT_FLTP as i32;
        assert_eq!(sample_format_name(fltp).as_deref(), Some("fltp"));
        assert_eq!(sample_format_name(-1), None);
        assert_eq!(sample_format_name(i32::MAX), None);
    }
}
