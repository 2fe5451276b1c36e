use std::path::PathBuf;

use attendance::{business_days, Attendance, STUDENTS};
use chrono::NaiveDate;
use rand::{rngs::StdRng, SeedableRng};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "attendance", about = "Monthly class attendance analytics")]
struct Opt {
    /// First day of the month (YYYY-MM-DD)
    #[structopt(long, default_value = "2024-01-01")]
    start: NaiveDate,
    /// Number of business days
    #[structopt(long, default_value = "20")]
    days: usize,
    /// Probability for a student to be present on a given day
    #[structopt(long, default_value = "0.85")]
    p_present: f64,
    /// Random generator seed
    #[structopt(long, default_value = "42")]
    seed: u64,
    /// Chart file
    #[structopt(short, long, parse(from_os_str), default_value = "attendance.svg")]
    output: PathBuf,
    /// Skip the chart
    #[structopt(long)]
    no_plot: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    anyhow::ensure!(
        (0. ..=1.).contains(&opt.p_present),
        "presence probability must be within [0,1], found {}",
        opt.p_present
    );

    let mut rng = StdRng::seed_from_u64(opt.seed);
    let days = business_days(opt.start, opt.days);
    log::info!(
        "simulating {} students over {} business days",
        STUDENTS.len(),
        days.len()
    );
    let sheet = Attendance::simulate(&STUDENTS, days, opt.p_present, &mut rng);

    if !opt.no_plot {
        sheet.plot(&opt.output)?;
    }
    println!("{}", sheet.report());
    Ok(())
}
