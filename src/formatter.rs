//! Log line formatting with the simulation tick in every line.
//!
//! Lines look like `12:04:31.52210 t0x01F3  INFO session{stage=Playing}: page_arcade::game: Ghost eaten points=400`.
//! The tick is a process-wide counter the session bumps once per simulation tick, which
//! makes it easy to line up log output with a particular frame.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

static TICKS: AtomicU64 = AtomicU64::new(0);

/// Only the low 16 bits are shown; the counter itself never wraps in practice.
const TICK_DISPLAY_MASK: u64 = 0xFFFF;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:5]");

#[derive(Clone, Copy)]
enum Style {
    Dim,
    Bold,
    Color(&'static str),
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Dim => "\x1b[2m",
            Style::Bold => "\x1b[1m",
            Style::Color(code) => code,
        }
    }
}

/// Writes `text` in `style` when the writer supports ANSI, plain otherwise.
fn styled(writer: &mut Writer<'_>, style: Style, text: impl fmt::Display) -> fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "{}{}\x1b[0m", style.code(), text)
    } else {
        write!(writer, "{}", text)
    }
}

fn level_style(level: &Level) -> (Style, &'static str) {
    match *level {
        Level::TRACE => (Style::Color("\x1b[35m"), "TRACE"),
        Level::DEBUG => (Style::Color("\x1b[34m"), "DEBUG"),
        Level::INFO => (Style::Color("\x1b[32m"), " INFO"),
        Level::WARN => (Style::Color("\x1b[33m"), " WARN"),
        Level::ERROR => (Style::Color("\x1b[31m"), "ERROR"),
    }
}

/// Event formatter printing timestamp, tick, level, span chain, target and fields.
pub struct CustomFormatter;

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();

        let timestamp = OffsetDateTime::now_utc().format(&TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        styled(&mut writer, Style::Dim, timestamp)?;
        writer.write_char(' ')?;

        styled(&mut writer, Style::Dim, format_args!("t0x{:04X}", current_tick() & TICK_DISPLAY_MASK))?;
        writer.write_char(' ')?;

        let (style, label) = level_style(meta.level());
        styled(&mut writer, style, label)?;
        writer.write_char(' ')?;

        if let Some(scope) = ctx.event_scope() {
            let mut any = false;
            for span in scope.from_root() {
                any = true;
                styled(&mut writer, Style::Bold, span.metadata().name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>().filter(|fields| !fields.is_empty()) {
                    styled(&mut writer, Style::Bold, "{")?;
                    write!(writer, "{}", fields)?;
                    styled(&mut writer, Style::Bold, "}")?;
                }
                styled(&mut writer, Style::Dim, ":")?;
            }
            if any {
                writer.write_char(' ')?;
            }
        }

        styled(&mut writer, Style::Dim, format_args!("{}:", meta.target()))?;
        writer.write_char(' ')?;

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Advances the tick shown in log lines. Called once per simulation tick.
pub fn advance_tick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

/// The current tick.
pub fn current_tick() -> u64 {
    TICKS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances() {
        let before = current_tick();
        advance_tick();
        assert!(current_tick() > before);
    }

    #[test]
    fn test_levels_are_aligned() {
        for level in [Level::TRACE, Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR] {
            assert_eq!(level_style(&level).1.len(), 5);
        }
    }
}
