use std::path::PathBuf;

use energy_monitors::{
    loader::DEFAULT_FILES, report, AnomalyFlagger, ConsumptionError, ConsumptionLoader,
    LoaderError, ReportOptions,
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "energy-monitors",
    about = "Hourly kWh consumption report with anomaly detection"
)]
struct Opt {
    /// Meter export files (default: the 3 Blower 78 exports)
    #[structopt(parse(from_os_str))]
    files: Vec<PathBuf>,
    /// Folder the meter export files are looked up in
    #[structopt(long, parse(from_os_str))]
    path: Option<PathBuf>,
    /// Date column name
    #[structopt(long, default_value = "TxnDate")]
    date_column: String,
    /// Time column name
    #[structopt(long, default_value = "TxnTime")]
    time_column: String,
    /// Consumption column name
    #[structopt(long, default_value = "Consumption")]
    consumption_column: String,
    /// Save the hourly table to that CSV file
    #[structopt(short, long, parse(from_os_str), default_value = "processed_results.csv")]
    output: PathBuf,
    /// Folder the charts are saved to
    #[structopt(long, parse(from_os_str), default_value = ".")]
    plot_dir: PathBuf,
    /// Skip the charts
    #[structopt(long)]
    no_plot: bool,
    /// Time series chart title
    #[structopt(long, default_value = "Blower 78 Energy Consumption")]
    title: String,
    /// Anomaly threshold in number of standard deviations above the mean
    #[structopt(long, default_value = "3")]
    sigma: f64,
    /// Delta degrees of freedom of the standard deviation
    #[structopt(long, default_value = "1")]
    ddof: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let mut loader = if opt.files.is_empty() {
        ConsumptionLoader::default()
    } else {
        ConsumptionLoader::default().files(opt.files)
    };
    if let Some(path) = &opt.path {
        loader = loader.data_path(path);
    }
    loader = loader
        .date_column(opt.date_column)
        .time_column(opt.time_column)
        .consumption_column(opt.consumption_column);
    log::debug!("input files: {:?} (default: {:?})", loader.file_list(), DEFAULT_FILES);

    let flagger = AnomalyFlagger::default().n_sigma(opt.sigma).ddof(opt.ddof);

    let mut options = ReportOptions::default()
        .output(opt.output)
        .title(opt.title);
    options = if opt.no_plot {
        options.no_plot()
    } else {
        options.plot_dir(opt.plot_dir)
    };

    match report::run(loader, &flagger, &options) {
        Ok(_) => Ok(()),
        Err(ConsumptionError::Loader(LoaderError::MissingFiles(files))) => {
            eprintln!("Error: The following files are missing: {:?}", files);
            eprintln!("Please copy them to the working directory or point to them with --path.");
            std::process::exit(1)
        }
        Err(e) => Err(e.into()),
    }
}
