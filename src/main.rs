//! # photo-triage CLI
//!
//! Command-line interface for the photo triage engine.
//!
//! ## Usage
//! ```bash
//! photo-triage run photos/photo --output photos/sorted
//! photo-triage run photos/photo --mode concurrent --workers 8 --format json
//! ```

mod cli;

use photo_triage::Result;

fn main() -> Result<()> {
    cli::run()
}
