/*!
Diagnostic events reported by the balancing pipeline.

The pipeline never logs on its own: a [`Balancer`](crate::Balancer) reports
to the [`EventSink`] it was built with. [`LogSink`] forwards to the `log`
facade, `()` discards everything.
*/

use std::fmt::Display;

use crate::solver::{FallbackReason, Method};

#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    Parsed {
        formula: &'a str,
        compounds: usize,
        elements: usize,
    },
    Fallback {
        reason: FallbackReason,
        method: Method,
    },
    Solved {
        method: Method,
        coefficients: &'a [f64],
    },
    Balanced {
        formula: &'a str,
    },
}

impl Display for Event<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Parsed {
                formula,
                compounds,
                elements,
            } => write!(
                f,
                "parsed '{}' into {} compounds over {} elements",
                formula, compounds, elements
            ),
            Event::Fallback { reason, method } => {
                write!(f, "primary path skipped ({}), solved with {}", reason, method)
            }
            Event::Solved {
                method,
                coefficients,
            } => write!(f, "solved with {}: {:?}", method, coefficients),
            Event::Balanced { formula } => write!(f, "balanced as '{}'", formula),
        }
    }
}

pub trait EventSink {
    fn record(&self, event: &Event<'_>);
}

impl EventSink for () {
    fn record(&self, _event: &Event<'_>) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&self, event: &Event<'_>) {
        match event {
            Event::Fallback { .. } => info!("{}", event),
            Event::Balanced { .. } => info!("{}", event),
            _ => debug!("{}", event),
        }
    }
}
