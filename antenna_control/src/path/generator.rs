//! Batched command generation and section chaining.

use std::iter::FusedIterator;

use antenna_common::antenna::config::ControlConfig;
use tracing::debug;

use super::PathError;
use super::context::ControlContext;
use super::engine::CoordinateEngine;
use super::section::Section;
use crate::clock::{Clock, SystemClock};

/// One command group: parallel coordinate and timestamp series [deg, s].
#[derive(Debug, Clone, PartialEq)]
pub struct TimedCoordinate {
    pub az: Vec<f64>,
    pub el: Vec<f64>,
    pub time: Vec<f64>,
    pub context: ControlContext,
}

impl TimedCoordinate {
    #[inline]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

// ─── Single Section ─────────────────────────────────────────────────

/// Iterator over the command groups of one section.
///
/// Timestamps are `start + i / frequency`. A bounded section yields
/// `ceil((stop - start) · frequency)` commands; an unbounded one yields
/// until the caller stops pulling.
pub struct SectionIter<'a, E> {
    section: Section,
    engine: &'a E,
    config: ControlConfig,
    context: ControlContext,
    n_cmd: f64,
    start: f64,
    total: Option<usize>,
    next_index: usize,
    batch: usize,
    done: bool,
}

impl<'a, E: CoordinateEngine> SectionIter<'a, E> {
    /// Schedule `section` after `predecessor_stop`, or `command_offset`
    /// after `now` when nothing precedes it.
    pub fn new(
        section: Section,
        engine: &'a E,
        config: ControlConfig,
        predecessor_stop: Option<f64>,
        now: f64,
    ) -> Result<Self, PathError> {
        let (n_cmd, mut context) = section.arguments(&config)?;
        let start = context.resolve_timing(predecessor_stop, now + config.command_offset);
        let freq = config.command_frequency;
        let total = context.stop.map(|stop| command_count((stop - start) * freq));
        debug!(
            start,
            stop = ?context.stop,
            commands = ?total,
            "section scheduled"
        );
        Ok(Self {
            section,
            engine,
            config,
            context,
            n_cmd,
            start,
            total,
            next_index: 0,
            batch: config.commands_per_group(),
            done: false,
        })
    }

    /// Resolved context of this section.
    pub fn context(&self) -> &ControlContext {
        &self.context
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    /// Commands left to yield, `None` when unbounded.
    pub fn remaining(&self) -> Option<usize> {
        self.total.map(|t| t.saturating_sub(self.next_index))
    }
}

/// Whole commands needed to cover `n` command intervals.
///
/// UNIX timestamps carry ~1e-7 s of rounding, so counts within 1e-3 of an
/// integer are taken as exact.
fn command_count(n: f64) -> usize {
    if n.is_nan() || n <= 0.0 {
        return 0;
    }
    let rounded = n.round();
    if (n - rounded).abs() < 1e-3 {
        rounded as usize
    } else {
        n.ceil() as usize
    }
}

impl<E: CoordinateEngine> Iterator for SectionIter<'_, E> {
    type Item = Result<TimedCoordinate, PathError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut end = self.next_index + self.batch;
        if let Some(total) = self.total {
            end = end.min(total);
        }
        if end <= self.next_index {
            self.done = true;
            return None;
        }

        let freq = self.config.command_frequency;
        let len = end - self.next_index;
        let mut batch = TimedCoordinate {
            az: Vec::with_capacity(len),
            el: Vec::with_capacity(len),
            time: Vec::with_capacity(len),
            context: self.context,
        };
        for i in self.next_index..end {
            let t = self.start + i as f64 / freq;
            match self
                .section
                .coordinate_at(self.engine, &self.config, i as f64, self.n_cmd, t)
            {
                Ok(p) => {
                    batch.az.push(p.az);
                    batch.el.push(p.el);
                    batch.time.push(t);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        self.next_index = end;
        Some(Ok(batch))
    }
}

impl<E: CoordinateEngine> FusedIterator for SectionIter<'_, E> {}

// ─── Chaining ───────────────────────────────────────────────────────

/// How often a section list is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Times(usize),
    Forever,
}

impl Repeat {
    /// Whether round `round` (0-based) should run.
    fn allows(self, round: usize) -> bool {
        match self {
            Self::Once => round == 0,
            Self::Times(n) => round < n,
            Self::Forever => true,
        }
    }
}

/// Sections played back to back.
///
/// Each section is scheduled when reached, starting at the `stop` of the one
/// before it, so relative sections form one gap-free stream.
pub struct Sequential<'a, E, C> {
    sections: Vec<Section>,
    engine: &'a E,
    config: ControlConfig,
    clock: C,
    repeat: Repeat,
    round: usize,
    position: usize,
    current: Option<SectionIter<'a, E>>,
    last_stop: Option<f64>,
    yielded_this_round: bool,
    done: bool,
}

impl<'a, E: CoordinateEngine, C: Clock> Sequential<'a, E, C> {
    pub fn new(
        sections: Vec<Section>,
        engine: &'a E,
        config: ControlConfig,
        clock: C,
        repeat: Repeat,
    ) -> Self {
        Self {
            sections,
            engine,
            config,
            clock,
            repeat,
            round: 0,
            position: 0,
            current: None,
            last_stop: None,
            yielded_this_round: false,
            done: false,
        }
    }

    /// `stop` of the last finished section.
    pub fn last_stop(&self) -> Option<f64> {
        self.last_stop
    }

    /// Context of the section currently being played.
    pub fn current_context(&self) -> Option<&ControlContext> {
        self.current.as_ref().map(SectionIter::context)
    }

    fn fail(&mut self, e: PathError) -> Option<Result<TimedCoordinate, PathError>> {
        self.done = true;
        self.current = None;
        Some(Err(e))
    }
}

impl<E: CoordinateEngine, C: Clock> Iterator for Sequential<'_, E, C> {
    type Item = Result<TimedCoordinate, PathError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if let Some(iter) = self.current.as_mut() {
                match iter.next() {
                    Some(Ok(batch)) => {
                        self.yielded_this_round = true;
                        return Some(Ok(batch));
                    }
                    Some(Err(e)) => return self.fail(e),
                    None => {
                        // A stop earlier than the running one must not rewind the stream.
                        if let Some(stop) = iter.context().stop {
                            self.last_stop =
                                Some(self.last_stop.map_or(stop, |last| last.max(stop)));
                        }
                        self.current = None;
                        self.position += 1;
                    }
                }
            }

            if self.position >= self.sections.len() {
                // A round producing nothing would spin forever on repeat.
                let idle = self.position > 0 && !self.yielded_this_round;
                if self.position > 0 {
                    self.round += 1;
                }
                if self.sections.is_empty() || idle || !self.repeat.allows(self.round) {
                    self.done = true;
                    return None;
                }
                self.position = 0;
                self.yielded_this_round = false;
            }

            let section = self.sections[self.position].clone();
            match SectionIter::new(
                section,
                self.engine,
                self.config,
                self.last_stop,
                self.clock.now(),
            ) {
                Ok(iter) => self.current = Some(iter),
                Err(e) => return self.fail(e),
            }
        }
    }
}

impl<E: CoordinateEngine, C: Clock> FusedIterator for Sequential<'_, E, C> {}

// ─── Generator ──────────────────────────────────────────────────────

/// Entry point binding a coordinate engine, settings and a clock.
pub struct PathGenerator<'a, E, C = SystemClock> {
    engine: &'a E,
    config: ControlConfig,
    clock: C,
}

impl<'a, E: CoordinateEngine> PathGenerator<'a, E> {
    pub fn new(engine: &'a E, config: ControlConfig) -> Self {
        Self::with_clock(engine, config, SystemClock)
    }
}

impl<'a, E: CoordinateEngine, C: Clock + Clone> PathGenerator<'a, E, C> {
    pub fn with_clock(engine: &'a E, config: ControlConfig, clock: C) -> Self {
        Self {
            engine,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Play a single section starting now.
    pub fn section(&self, section: Section) -> Result<SectionIter<'a, E>, PathError> {
        SectionIter::new(section, self.engine, self.config, None, self.clock.now())
    }

    /// Play `sections` back to back.
    pub fn sequential(&self, sections: Vec<Section>, repeat: Repeat) -> Sequential<'a, E, C> {
        Sequential::new(
            sections,
            self.engine,
            self.config,
            self.clock.clone(),
            repeat,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::path::engine::{Frame, HorizontalEngine, Target};
    use crate::path::section::{Scan, Timing, Track};

    const T0: f64 = 1000.0;

    fn config() -> ControlConfig {
        ControlConfig {
            command_frequency: 50.0,
            command_group_duration: 1.0,
            command_offset: 0.1,
            scan_margin: 0.1,
            ..Default::default()
        }
    }

    fn scan() -> Scan {
        Scan::new((0.0, 30.0), (1.0, 30.0), Frame::AltAz, 0.5)
    }

    fn generator(engine: &HorizontalEngine) -> PathGenerator<'_, HorizontalEngine, ManualClock> {
        PathGenerator::with_clock(engine, config(), ManualClock::new(T0))
    }

    #[test]
    fn linear_yields_groups_then_ends() {
        let engine = HorizontalEngine;
        let paths = generator(&engine);
        let batches: Vec<_> = paths
            .section(Section::Linear(scan()))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 50);
        assert_eq!(batches[1].len(), 50);
        assert!((batches[0].time[0] - (T0 + 0.1)).abs() < 1e-9);
        assert!((batches[1].time[49] - (T0 + 0.1 + 99.0 / 50.0)).abs() < 1e-9);
        assert!((batches[1].az[49] - 0.99).abs() < 1e-9);
    }

    #[test]
    fn last_group_may_be_short() {
        let engine = HorizontalEngine;
        let paths = generator(&engine);
        let track = Track::new(Target::altaz(10.0, 40.0)).with_timing(Timing {
            duration: Some(1.5),
            ..Default::default()
        });
        let sizes: Vec<usize> = paths
            .section(Section::Track(track))
            .unwrap()
            .map(|b| b.unwrap().len())
            .collect();
        assert_eq!(sizes, vec![50, 25]);
    }

    #[test]
    fn unbounded_track_keeps_going() {
        let engine = HorizontalEngine;
        let paths = generator(&engine);
        let mut iter = paths
            .section(Section::Track(Track::new(Target::altaz(10.0, 40.0))))
            .unwrap();
        assert_eq!(iter.remaining(), None);

        let batches: Vec<_> = iter.by_ref().take(3).map(Result::unwrap).collect();
        assert_eq!(batches.len(), 3);
        let gap = batches[1].time[0] - batches[0].time[49];
        assert!((gap - 0.02).abs() < 1e-9);
        assert!(iter.next().is_some());
    }

    #[test]
    fn chained_section_starts_at_previous_stop() {
        let engine = HorizontalEngine;
        let paths = generator(&engine);
        let batches: Vec<_> = paths
            .sequential(scan().into_sections().to_vec(), Repeat::Once)
            .collect::<Result<_, _>>()
            .unwrap();

        // 20 run-up commands in one group, then 100 scan commands.
        assert_eq!(batches.len(), 3);
        let run_up = batches[0].context;
        let linear = batches[1].context;
        assert!(!run_up.tight && linear.tight);
        assert_eq!(linear.start, run_up.stop);
        assert_eq!(Some(batches[1].time[0]), run_up.stop);
        assert!((run_up.stop.unwrap() - (T0 + 0.1 + 0.4)).abs() < 1e-9);
    }

    #[test]
    fn repetitions_continue_the_stream() {
        let engine = HorizontalEngine;
        let paths = generator(&engine);
        let mut seq = paths.sequential(scan().into_sections().to_vec(), Repeat::Times(2));
        let batches: Vec<_> = seq.by_ref().map(Result::unwrap).collect();

        assert_eq!(batches.len(), 6);
        assert_eq!(batches[3].context.start, batches[2].context.stop);
        assert!((seq.last_stop().unwrap() - (T0 + 0.1 + 2.0 * 2.4)).abs() < 1e-9);
    }

    #[test]
    fn forever_repeats() {
        let engine = HorizontalEngine;
        let paths = generator(&engine);
        let count = paths
            .sequential(scan().into_sections().to_vec(), Repeat::Forever)
            .take(30)
            .count();
        assert_eq!(count, 30);
    }

    #[test]
    fn command_count_tolerates_timestamp_rounding() {
        assert_eq!(command_count(100.000_012), 100);
        assert_eq!(command_count(99.999_99), 100);
        assert_eq!(command_count(12.5), 13);
        assert_eq!(command_count(0.0), 0);
        assert_eq!(command_count(-3.0), 0);
        assert_eq!(command_count(f64::NAN), 0);
    }

    #[test]
    fn empty_list_yields_nothing() {
        let engine = HorizontalEngine;
        let paths = generator(&engine);
        assert!(paths.sequential(Vec::new(), Repeat::Forever).next().is_none());
    }

    #[test]
    fn engine_error_is_yielded_once() {
        let engine = HorizontalEngine;
        let paths = generator(&engine);
        let sections = vec![
            Section::Track(Track::new(Target::Named("jupiter".into()))),
            Section::Linear(scan()),
        ];
        let mut seq = paths.sequential(sections, Repeat::Once);
        assert!(matches!(seq.next(), Some(Err(PathError::Engine(_)))));
        assert!(seq.next().is_none());
        assert!(seq.next().is_none());
    }

    #[test]
    fn early_stop_never_rewinds_the_stream() {
        let engine = HorizontalEngine;
        let paths = generator(&engine);
        let timed = |timing: Timing| {
            Section::Track(Track::new(Target::altaz(0.0, 45.0)).with_timing(timing))
        };
        let sections = vec![
            timed(Timing {
                start: Some(T0),
                duration: Some(2.0),
                ..Default::default()
            }),
            // Already over by the time it is reached.
            timed(Timing {
                stop: Some(T0 + 1.0),
                ..Default::default()
            }),
            timed(Timing {
                duration: Some(1.0),
                ..Default::default()
            }),
        ];
        let mut seq = paths.sequential(sections, Repeat::Once);
        let times: Vec<f64> = seq.by_ref().flat_map(|b| b.unwrap().time).collect();

        assert_eq!(times.len(), 150);
        for pair in times.windows(2) {
            assert!(pair[1] > pair[0], "time went back: {pair:?}");
        }
        assert!((times[100] - (T0 + 2.0)).abs() < 1e-9);
        assert!((seq.last_stop().unwrap() - (T0 + 3.0)).abs() < 1e-9);
    }

    #[test]
    fn explicit_start_ignores_predecessor() {
        let engine = HorizontalEngine;
        let paths = generator(&engine);
        let later = Track::new(Target::altaz(0.0, 45.0)).with_timing(Timing {
            start: Some(T0 + 100.0),
            duration: Some(0.1),
            ..Default::default()
        });
        let batches: Vec<_> = paths
            .sequential(
                vec![Section::Linear(scan()), Section::Track(later)],
                Repeat::Once,
            )
            .map(Result::unwrap)
            .collect();
        let last = batches.last().unwrap();
        assert_eq!(last.len(), 5);
        assert_eq!(last.time[0], T0 + 100.0);
    }
}
