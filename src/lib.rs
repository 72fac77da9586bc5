pub mod abc;
pub mod error;
pub mod lang;
pub mod note;
pub mod sonoc;
pub mod synth;

pub use error::Error;

use lang::{Interpreter, Listener};
use synth::{SynthOptions, Voice};

/// Compile source code straight into a timeline starting at `now`.
pub fn perform<L: Listener + ?Sized>(
    source: &str,
    now: f64,
    options: SynthOptions,
    listener: &mut L,
) -> Result<Vec<Voice>, Error> {
    let program = lang::parse(source)?;
    Interpreter::new(options).execute(&program, now, listener)
}
