//! Phase timing for the CLI, rendered as a table behind `--time`.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use cli_table::{format::Justify, Cell, Row, RowStruct, Style, Table};
use num_format::{Locale, ToFormattedString};

#[derive(Default)]
pub struct Timings {
    /// finished phases in completion order; a key repeats when its
    /// phase runs once per cell
    entries: Vec<(&'static str, Duration)>,
    pending: HashMap<&'static str, Vec<Instant>>,
}

impl Timings {
    pub fn start(
        &mut self,
        key: &'static str,
    ) {
        self.pending.entry(key).or_default().push(Instant::now());
    }

    pub fn end(
        &mut self,
        key: &'static str,
    ) {
        let start = self.pending.get_mut(key).and_then(Vec::pop);
        match start {
            Some(start) => self.entries.push((key, start.elapsed())),
            None => eprintln!("timing error: ended phase {key:?} that never started"),
        }
    }

    /// One row per phase, in the order phases first finished; repeated
    /// phases are summed.
    pub fn render(&self) -> String {
        let unended = self.pending.iter().filter(|(_, starts)| !starts.is_empty()).map(|(key, _)| *key).collect::<Vec<_>>();
        if !unended.is_empty() {
            eprintln!("timing error: phases never ended: {unended:?}");
        }

        let mut totals: Vec<(&'static str, Duration)> = Vec::new();
        for &(key, duration) in &self.entries {
            match totals.iter_mut().find(|entry| entry.0 == key) {
                Some(entry) => entry.1 += duration,
                None => totals.push((key, duration)),
            }
        }

        let mut table = vec![];
        for (key, total) in totals {
            let duration = match total.as_millis() {
                x if x < 10 => format!("{} ns", total.as_nanos().to_formatted_string(&Locale::en)),
                otherwise => format!("{} ms", otherwise.to_formatted_string(&Locale::en)),
            };
            let row: RowStruct = vec![key.cell().bold(true), duration.cell().justify(Justify::Right)].row();
            table.push(row);
        }

        let table = table
            .table()
            .title(vec!["Phase".cell().bold(true), "Total Duration".cell().bold(true)])
            .display()
            .expect("failed to render timings table");

        format!("{table}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_phases_are_summed_into_one_row() {
        let mut timings = Timings::default();
        timings.start("per cell");
        timings.end("per cell");
        timings.start("per cell");
        timings.end("per cell");
        timings.start("report");
        timings.end("report");

        let rendered = timings.render();
        assert_eq!(rendered.matches("per cell").count(), 1);
        assert!(rendered.contains("report"));
        assert!(rendered.contains("Phase"));
    }

    #[test]
    fn ending_an_unstarted_phase_is_not_fatal() {
        let mut timings = Timings::default();
        timings.end("nope");
        assert!(timings.render().contains("Phase"));
    }
}
