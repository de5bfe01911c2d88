use std::str::FromStr;

use clap::{Parser, ValueEnum};
use tetrad::{
    chord::{ChordPoint, ChordSpace, VirtualFundamentalFilter},
    complexity::Complexity,
    limit::{Limit, PrimeLimit},
    voicing,
};

use crate::{
    dto::{ChordDto, ScanDto},
    engine::ChordEngine,
    App, CliError, CliResult,
};

#[derive(Parser)]
pub struct ScanOptions {
    /// Limit family constraining the chord intervals
    #[arg(long = "limit-type", value_enum, default_value_t = LimitType::Odd)]
    limit_type: LimitType,

    /// Limit value.
    /// In prime mode, either a prime ceiling ("7") or a dot-separated prime list ("3.5.7")
    #[arg(long = "limit", default_value = "9")]
    limit_value: String,

    /// Largest allowed prime exponent (prime mode only)
    #[arg(long = "max-exponent", default_value_t = 3)]
    max_exponent: u32,

    /// Interval of repetition bounding the chord span
    #[arg(long = "equave", default_value_t = 2.0)]
    equave_ratio: f64,

    /// Complexity measure used to score chords
    #[arg(long = "complexity", default_value = "tenney", value_parser = Complexity::from_str)]
    complexity: Complexity,

    /// Skip chords with repeated members
    #[arg(long = "hide-unisons")]
    hide_unison_voices: bool,

    /// Skip chords containing an octave between any two voices
    #[arg(long = "omit-octaves")]
    omit_octaves: bool,

    /// Only keep chords whose virtual fundamental denominator matches
    /// the given dot-separated list ("1.2.4") or inclusive range ("1...8")
    #[arg(long = "vf", value_parser = VirtualFundamentalFilter::from_str)]
    virtual_fundamental_filter: Option<VirtualFundamentalFilter>,

    /// Output format
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Copy, Clone, ValueEnum)]
enum LimitType {
    #[value(name = "odd")]
    Odd,
    #[value(name = "integer")]
    Integer,
    #[value(name = "prime")]
    Prime,
}

#[derive(Copy, Clone, ValueEnum)]
enum OutputFormat {
    #[value(name = "table")]
    Table,
    #[value(name = "csv")]
    Csv,
    #[value(name = "yaml")]
    Yaml,
}

impl ScanOptions {
    pub fn run(self, app: &mut App) -> CliResult<()> {
        let space = ChordSpace {
            limit: self.limit()?,
            equave_ratio: self.equave_ratio,
            complexity: self.complexity,
            hide_unison_voices: self.hide_unison_voices,
            omit_octaves: self.omit_octaves,
            virtual_fundamental_filter: self.virtual_fundamental_filter.clone(),
        };

        let (engine, results) = ChordEngine::new(voicing::DEFAULT_BASE_FREQ_HZ);
        engine.request_enumeration(space);
        let enumeration = results
            .recv()
            .map_err(|err| CliError::CommandError(err.to_string()))?;
        log::debug!("Rendering enumeration generation {}", enumeration.generation);

        if enumeration.points.is_empty() {
            app.errln("No chords satisfy the given limits")?;
            return Ok(());
        }

        match self.format {
            OutputFormat::Table => self.render_table(app, &enumeration.points),
            OutputFormat::Csv => self.render_csv(app, &enumeration.points),
            OutputFormat::Yaml => self.render_yaml(app, &enumeration.points),
        }
    }

    fn limit(&self) -> CliResult<Limit> {
        let limit = match self.limit_type {
            LimitType::Odd => Limit::odd(self.parse_numeric_limit()?),
            LimitType::Integer => Limit::integer(self.parse_numeric_limit()?),
            LimitType::Prime => Limit::Prime(
                PrimeLimit::from_spec(&self.limit_value, self.max_exponent)
                    .map_err(|err| err.to_string())?,
            ),
        };
        Ok(limit)
    }

    fn parse_numeric_limit(&self) -> Result<u32, String> {
        self.limit_value.parse().map_err(|_| {
            format!(
                "Invalid limit '{}': Must be a positive integer",
                self.limit_value
            )
        })
    }

    fn render_table(&self, app: &mut App, points: &[ChordPoint]) -> CliResult<()> {
        for point in points {
            app.writeln(format!(
                "{} | {:>9.3} {:>9.3} {:>9.3} | {:.3}",
                point.chord, point.cents[0], point.cents[1], point.cents[2], point.complexity,
            ))?;
        }
        Ok(())
    }

    fn render_csv(&self, app: &mut App, points: &[ChordPoint]) -> CliResult<()> {
        app.writeln("chord,interval1_cents,interval2_cents,interval3_cents,complexity")?;
        for point in points {
            app.writeln(format!(
                "{},{:.3},{:.3},{:.3},{:.3}",
                point.chord, point.cents[0], point.cents[1], point.cents[2], point.complexity,
            ))?;
        }
        Ok(())
    }

    fn render_yaml(&self, app: &mut App, points: &[ChordPoint]) -> CliResult<()> {
        let dto = ScanDto {
            chords: points.iter().map(ChordDto::from).collect(),
        };
        let yaml = serde_yaml::to_string(&dto)
            .map_err(|err| CliError::CommandError(err.to_string()))?;
        app.write(yaml)?;
        Ok(())
    }
}
