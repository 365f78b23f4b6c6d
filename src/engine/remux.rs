//! Packet-copy remux writer

use tracing::{debug, info, warn};

use crate::domain::model::{SourceId, Timebase};
use crate::engine::interleave::SubtitleQueue;
use crate::engine::progress::ProgressReporter;
use crate::engine::{RemuxOptions, RemuxStats};
use crate::error::{RemuxError, RemuxResult};
use crate::ports::{MediaPacket, MediaSink, MediaSource};
use crate::streams::OutputStreamMap;
use crate::utils::plural;

/// Per-output-stream timing: where packets come from and where they go
#[derive(Debug, Clone, Copy)]
struct Route {
    input: Timebase,
    output: Timebase,
}

/// Copies selected packets from one or two sources into a sink
pub struct RemuxWriter<'a, K: MediaSink> {
    sink: &'a mut K,
    map: &'a OutputStreamMap,
    options: &'a RemuxOptions,
    progress: &'a mut ProgressReporter,
    routes: Vec<Route>,
    stats: RemuxStats,
}

impl<'a, S, K> RemuxWriter<'a, K>
where
    S: MediaSource,
    K: MediaSink<Source = S>,
{
    pub fn new(
        sink: &'a mut K,
        map: &'a OutputStreamMap,
        options: &'a RemuxOptions,
        progress: &'a mut ProgressReporter,
    ) -> Self {
        Self {
            sink,
            map,
            options,
            progress,
            routes: Vec::new(),
            stats: RemuxStats::default(),
        }
    }

    /// Create the output streams, write the header, copy every selected packet
    /// and write the trailer.
    ///
    /// Errors before the header is written leave the sink untouched beyond
    /// what the caller releases. Once the header is written the trailer is
    /// always attempted, even if copying fails part way.
    pub fn run(mut self, primary: &mut S, mut secondary: Option<&mut S>) -> RemuxResult<RemuxStats> {
        self.sink.copy_metadata(primary);

        let mut inputs = Vec::with_capacity(self.map.len());
        for stream in self.map.streams() {
            let source: &S = match stream.source {
                SourceId::Primary => &*primary,
                SourceId::Secondary => secondary.as_deref().ok_or_else(|| RemuxError::StreamCreate {
                    message: format!("stream {} refers to a missing secondary source", stream),
                })?,
            };
            let info = source.stream(stream.index).ok_or_else(|| RemuxError::StreamCreate {
                message: format!("input stream {} does not exist", stream),
            })?;

            let out = self.sink.add_stream(source, info)?;
            debug!("input stream {} -> output stream {} ({})", stream, out, info.codec);
            inputs.push(info.time_base);
        }

        self.sink.write_header()?;

        self.routes = inputs
            .into_iter()
            .enumerate()
            .map(|(out, input)| Route {
                input,
                output: self.sink.time_base(out),
            })
            .collect();

        let copied = self.copy_packets(primary, secondary.as_deref_mut());
        self.progress.finish();
        let trailer = self.sink.write_trailer();

        copied?;
        trailer?;

        info!(
            "wrote {} {} ({} dropped, {} rejected)",
            self.stats.written,
            plural("packet", self.stats.written as usize),
            self.stats.skipped,
            self.stats.rejected
        );
        Ok(self.stats)
    }

    fn copy_packets(&mut self, primary: &mut S, secondary: Option<&mut S>) -> RemuxResult<()> {
        let mut queue = match secondary {
            Some(source) => self.prefetch(source)?,
            None => SubtitleQueue::empty(),
        };

        let mut anchor = i64::MIN;
        while let Some(packet) = next_packet(primary, "primary") {
            let Some(out) = self.map.output_index(SourceId::Primary, packet.stream_index()) else {
                self.stats.skipped += 1;
                continue;
            };

            if let Some(dts) = packet.dts() {
                let route = self.routes[out];
                anchor = anchor.max(route.input.rescale(dts, Timebase::av_time_base()));
            }
            while let Some((sub_out, sub)) = queue.pop_due(anchor) {
                self.write(sub, sub_out);
            }

            self.write(packet, out);
        }

        if !queue.is_empty() {
            warn!(
                "{} secondary {} extend past the primary source; appending at the end",
                queue.len(),
                plural("packet", queue.len())
            );
            self.stats.unanchored = queue.len() as u64;
            for (out, packet) in queue.drain() {
                self.write(packet, out);
            }
        }

        Ok(())
    }

    /// Read every selected secondary packet, shifted by the subtitle delay, sorted by dts
    fn prefetch(&mut self, source: &mut S) -> RemuxResult<SubtitleQueue<(usize, S::Packet)>> {
        let delay = self.options.subtitle_delay;
        let mut items = Vec::new();

        while let Some(mut packet) = next_packet(source, "secondary") {
            let Some(out) = self.map.output_index(SourceId::Secondary, packet.stream_index()) else {
                self.stats.skipped += 1;
                continue;
            };
            let input = self.routes[out].input;

            if delay != 0.0 {
                let shift = input.seconds_to_ts(delay);
                packet.set_pts(packet.pts().map(|ts| ts.saturating_add(shift)));
                packet.set_dts(packet.dts().map(|ts| ts.saturating_add(shift)));
            }

            let key = input.rescale(packet.dts().unwrap_or(0), Timebase::av_time_base());
            items.push((key, (out, packet)));
        }

        info!("buffered {} subtitle {} from secondary source", items.len(), plural("packet", items.len()));
        Ok(SubtitleQueue::new(items))
    }

    /// Rescale and hand one packet to the sink. A rejected packet is logged and skipped.
    fn write(&mut self, mut packet: S::Packet, out: usize) {
        let route = self.routes[out];

        self.progress.observe(packet.pts().map(|pts| route.input.ts_to_seconds(pts)));

        packet.set_stream_index(out);
        packet.set_pts(packet.pts().map(|ts| route.input.rescale(ts, route.output)));
        packet.set_dts(packet.dts().map(|ts| route.input.rescale(ts, route.output)));
        packet.set_duration(route.input.rescale(packet.duration(), route.output));
        packet.clear_position();

        if packet.dts().is_none() {
            warn!("packet {} (s:{}) has no dts", self.stats.written + self.stats.rejected, out);
            packet.set_dts(Some(0));
            self.stats.dts_patched += 1;
        }

        match self.sink.write_packet(packet) {
            Ok(()) => self.stats.written += 1,
            Err(e) => {
                warn!("{}", e);
                self.stats.rejected += 1;
            }
        }
    }
}

/// Next packet of `source`; a read error is logged and treated as end of input
fn next_packet<S: MediaSource>(source: &mut S, label: &str) -> Option<S::Packet> {
    match source.read_packet() {
        Ok(packet) => packet,
        Err(e) => {
            warn!("stopped reading {} source: {}", label, e);
            None
        }
    }
}

/// Convenience for callers that do not need the writer itself
pub fn remux<S, K>(
    primary: &mut S,
    secondary: Option<&mut S>,
    map: &OutputStreamMap,
    sink: &mut K,
    options: &RemuxOptions,
    progress: &mut ProgressReporter,
) -> RemuxResult<RemuxStats>
where
    S: MediaSource,
    K: MediaSink<Source = S>,
{
    RemuxWriter::new(sink, map, options, progress).run(primary, secondary)
}
