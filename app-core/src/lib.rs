#![warn(clippy::all, rust_2018_idioms)]

pub mod event;
pub mod report;
pub mod string_error;

#[cfg(test)]
mod tests {
    use crate::{
        event::{AppEvent, EventState},
        report::{Level, RecordingReporter, Reporter},
        string_error::ErrorStringExt,
    };

    struct Counter {
        count: usize,
    }

    // Needs two polls before it finishes.
    struct SlowIncrement {
        polls: usize,
    }

    impl AppEvent for SlowIncrement {
        type App = Counter;

        fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
            self.polls += 1;
            if self.polls < 2 {
                return Ok(EventState::Busy);
            }
            app.count += 1;
            Ok(EventState::Finished)
        }
    }

    #[test]
    fn test_busy_event_finishes_on_second_poll() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut app = Counter { count: 0 };
        let mut event = SlowIncrement { polls: 0 };
        assert_eq!(event.apply(&mut app), Ok(EventState::Busy));
        assert_eq!(app.count, 0);
        assert_eq!(event.apply(&mut app), Ok(EventState::Finished));
        assert_eq!(app.count, 1);
    }

    #[test]
    fn test_recording_reporter_keeps_order() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut reporter = RecordingReporter::new();
        reporter.info("loaded");
        reporter.warn("nothing selected");
        reporter.error("boom");

        assert_eq!(reporter.reports.len(), 3);
        assert_eq!(reporter.count(Level::Warning), 1);
        let last = reporter.last().unwrap();
        assert_eq!(last.level, Level::Error);
        assert_eq!(last.to_string(), "error: boom");
    }

    #[test]
    fn test_err_to_string_prefixes_context() {
        let res: Result<u8, std::num::ParseIntError> = "x".parse::<u8>();
        let err = res.err_to_string("could not parse count").unwrap_err();
        assert!(err.starts_with("could not parse count: "));
    }
}
