//! `riser ops`

use anyhow::bail;

use crate::commands::CliArgs;
use crate::utils::generate_apikey;

pub fn ops(args: &CliArgs) -> anyhow::Result<()> {
    match args.positional.get(1).map(String::as_str) {
        Some("generate-apikey") => {
            print!("{}", generate_apikey());
            Ok(())
        }
        Some(other) => bail!("Unknown ops command {:?}", other),
        None => bail!("Missing ops command. Available: generate-apikey"),
    }
}
