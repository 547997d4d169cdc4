//! snark-demo binary

use anyhow::Result;
use cli::run;

fn main() -> Result<()> {
    run()
}
