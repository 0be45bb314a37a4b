//! Pipeline steps behind each subcommand

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Args as ClapArgs;
use desmaps_core::{DesmapsConfig, MagnitudeBin, MagnitudeHistogram, Tabulator};
use desmaps_io::{open_file, read_records, write_records, MagnitudeColumn};
use tracing::info;

type CommandResult<T> = Result<T, Box<dyn Error>>;

/// Where to find the magnitudes
#[derive(ClapArgs, Debug, Clone)]
pub struct CatalogArgs {
    /// Input catalog (.csv or .tsv)
    #[arg(long)]
    pub input: PathBuf,

    /// Magnitude column name
    #[arg(long, default_value = "mag_auto")]
    pub column: String,

    /// Band index for multi-band magnitudes, read from `{column}_{band}`.
    /// The completeness calibration assumes i-band, which is band 2
    #[arg(long, default_value_t = 2)]
    pub band: usize,

    /// Read `--column` as is, without a band suffix
    #[arg(long, default_value_t = false)]
    pub single_band: bool,
}

impl CatalogArgs {
    fn magnitude_column(&self) -> MagnitudeColumn {
        let column = MagnitudeColumn::new(&self.column);
        if self.single_band {
            column
        } else {
            column.with_band(self.band)
        }
    }
}

/// Load and validate parameters; no file means all defaults
pub fn load_config(path: Option<&Path>) -> CommandResult<DesmapsConfig> {
    let config = match path {
        Some(path) => {
            info!(path = %path.display(), "reading parameters");
            DesmapsConfig::from_toml(&std::fs::read_to_string(path)?)?
        }
        None => DesmapsConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Bin a catalog column and write the N(m) table
pub fn make_nofm_file(
    catalog: &CatalogArgs,
    output: &Path,
    config: &DesmapsConfig,
) -> CommandResult<MagnitudeHistogram> {
    let input = catalog.input.to_str().ok_or("input path is not valid UTF-8")?;
    let reader = open_file(input)?;
    let mags = reader.read_magnitudes(&catalog.magnitude_column())?;

    info!(count = mags.len(), "making nofm");
    let nofm = MagnitudeHistogram::from_config(&mags, &config.nofm)?;
    info!(
        binned = nofm.total(),
        dropped = mags.len() as u64 - nofm.total(),
        "binned magnitudes"
    );

    let mut header = config.header_entries();
    header.push(("column".to_string(), catalog.magnitude_column().to_string()));
    write_records(output, nofm.bins(), &header)?;
    Ok(nofm)
}

/// Tabulate neff over the configured depth-limit grid and write the table
pub fn make_neff_file(
    nofm_path: &Path,
    output: &Path,
    config: &DesmapsConfig,
) -> CommandResult<desmaps_core::DepthLimitTable> {
    let bins: Vec<MagnitudeBin> = read_records(nofm_path)?;
    let nofm = MagnitudeHistogram::from_bins(bins)?;

    let maglims = config.grid.values();
    info!(
        rows = maglims.len(),
        min_int_mag = config.tabulation.min_integration_mag,
        "tabulating neff vs maglim"
    );
    let tabulator = Tabulator::new(config.tabulation)?;
    let table = tabulator.tabulate(&nofm, &maglims, None, None)?;

    write_records(output, table.rows(), &config.header_entries())?;
    Ok(table)
}
