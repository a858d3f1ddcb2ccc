use camino::{Utf8Path, Utf8PathBuf};

/// Bar resolutions the pipeline notebooks work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    OneSecond,
    OneMinute,
    FiveMinute,
}

impl Timeframe {
    pub fn all() -> [Timeframe; 3] {
        [
            Timeframe::OneSecond,
            Timeframe::OneMinute,
            Timeframe::FiveMinute,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneSecond => "1sec",
            Timeframe::OneMinute => "1min",
            Timeframe::FiveMinute => "5min",
        }
    }
}

/// Per-timeframe directory families, in the order they are provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    /// Split CSVs produced by the aggregator and splitter notebooks.
    Bars,
    /// Alpha101 signal arrays.
    Alpha101,
    /// RNN prediction arrays from notebook 4.
    Predictions,
    /// PPO actor/critic checkpoints from notebook 5.
    Agents,
}

impl Group {
    fn all() -> [Group; 4] {
        [Group::Bars, Group::Alpha101, Group::Predictions, Group::Agents]
    }

    fn path(&self, timeframe: Timeframe) -> Utf8PathBuf {
        let tf = timeframe.as_str();
        match self {
            Group::Bars => Utf8PathBuf::from(format!("data/{tf}")),
            Group::Alpha101 => Utf8PathBuf::from(format!("data/{tf}/alpha101")),
            Group::Predictions => Utf8PathBuf::from(format!("output/4_1/{tf}")),
            Group::Agents => Utf8PathBuf::from(format!("trained_agents/5_7_3/{tf}/PPO")),
        }
    }
}

/// Ordered list of relative directories to provision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    dirs: Vec<Utf8PathBuf>,
}

impl Manifest {
    /// The fixed layout expected by the pipeline notebooks.
    pub fn pipeline() -> Self {
        let dirs = Group::all()
            .iter()
            .flat_map(|group| Timeframe::all().map(|tf| group.path(tf)))
            .collect();
        Self { dirs }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Utf8Path> {
        self.dirs.iter().map(Utf8PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }
}
