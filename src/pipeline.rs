//! Runs the conversion phases in order: import, cleanup, straightness,
//! height rules and the height solver.

use std::ops::ControlFlow;

use crate::error::Result;
use crate::height::{add_rules, GroundHeight, HeightSolver, SolveReport};
use crate::import::{ImportReport, SourceWay, TrackImporter, WayTyper};
use crate::models::{Cleanup, CleanupReport, Straightness, TrackNetwork};
use crate::settings::ConversionSettings;

/// What every phase did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProcessReport {
    pub import: ImportReport,
    pub cleanup: CleanupReport,
    pub straight_connections: usize,
    pub height_rules: usize,
    pub solve: SolveReport,
}

/// Conversion driver holding validated settings
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    settings: ConversionSettings,
}

impl Pipeline {
    /// # Errors
    ///
    /// Returns an error if the settings are out of range
    pub fn new(settings: ConversionSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    #[must_use]
    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Build a network from source ways and process it
    ///
    /// # Errors
    ///
    /// Returns an error if a phase fails
    pub fn convert(
        &self,
        ways: &[SourceWay],
        typers: &[&dyn WayTyper],
        ground: &impl GroundHeight,
    ) -> Result<(TrackNetwork, ProcessReport)> {
        let mut network = TrackNetwork::new();
        let import = TrackImporter::new().import(&mut network, ways, typers)?;
        let mut report = self.process(&mut network, ground)?;
        report.import = import;
        Ok((network, report))
    }

    /// Process an already populated network
    ///
    /// # Errors
    ///
    /// Returns an error if a phase fails
    pub fn process(&self, network: &mut TrackNetwork, ground: &impl GroundHeight) -> Result<ProcessReport> {
        self.process_with(network, ground, |_, _| ControlFlow::Continue(()))
    }

    /// Process a network, asking `after_pass` between solver passes whether to go on
    ///
    /// # Errors
    ///
    /// Returns an error if a phase fails
    pub fn process_with<F>(
        &self,
        network: &mut TrackNetwork,
        ground: &impl GroundHeight,
        after_pass: F,
    ) -> Result<ProcessReport>
    where
        F: FnMut(usize, &TrackNetwork) -> ControlFlow<()>,
    {
        #[cfg(feature = "perf_timing")]
        let _timer = crate::logging::PhaseTimer::start("process");

        let cleanup = network.cleanup();
        let straight_connections = network.classify_straightness();
        let height_rules = add_rules(network, ground, &self.settings.rules)?;
        let solve = HeightSolver::new(self.settings.solver.clone()).optimize_with(network, after_pass);

        log::info!(
            "Processed {} nodes and {} connections ({} split, {} straight, {} rules)",
            network.node_count(),
            network.connection_count(),
            cleanup.split,
            straight_connections,
            height_rules
        );
        Ok(ProcessReport {
            import: ImportReport::default(),
            cleanup,
            straight_connections,
            height_rules,
            solve,
        })
    }
}
