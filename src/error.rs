use crate::loader::LoaderError;
#[cfg(feature = "plot")]
use crate::plot::PlotError;

#[derive(thiserror::Error, Debug)]
pub enum ConsumptionError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error("no consumption record to resample")]
    NoRecords,
    #[error("failed to write the consumption table")]
    Csv(#[from] csv::Error),
    #[cfg(feature = "plot")]
    #[error("Error in the `plot` module")]
    Plot(#[from] PlotError),
}
