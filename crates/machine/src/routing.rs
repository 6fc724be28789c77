//! Analog routing graph.
//!
//! The graph is small and fixed per product: four named terminals and a
//! static route table connecting them to the codec's internal mixer nodes.
//! Route identities never change at runtime — headset insertion only toggles
//! terminal enablement (speaker off while a headset is plugged).

use platform::{HeadsetState, MachineError, TerminalControl};

/// External speaker terminal.
pub const SPEAKER: &str = "Ext Speaker";
/// Headphone jack terminal.
pub const HEADPHONE: &str = "Headphone Jack";
/// Headset (jack) microphone terminal.
pub const HEADSET_MIC: &str = "Headset Mic";
/// On-board microphone terminal.
pub const MAIN_MIC: &str = "Main Mic";

/// A fixed connection between a sink node and a source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Sink endpoint.
    pub sink: &'static str,
    /// Source endpoint.
    pub source: &'static str,
}

/// Card-level connections to the codec mixer nodes.
///
/// This table is the single source of truth for the card's signal paths; it
/// is registered with the routing collaborator at bring-up and never touched
/// again.
pub const AUDIO_MAP: &[Route] = &[
    // Headphone connected to the HP output PGAs.
    Route { sink: HEADPHONE, source: "HPL Out PGA" },
    Route { sink: HEADPHONE, source: "HPR Out PGA" },
    // External speaker connected to the SPK output PGAs.
    Route { sink: SPEAKER, source: "SPKL Out PGA" },
    Route { sink: SPEAKER, source: "SPKR Out PGA" },
    // Microphones feed the boost stages (automatic bias).
    Route { sink: "Mic2 Boost", source: HEADSET_MIC },
    Route { sink: "Mic1 Boost", source: MAIN_MIC },
];

struct Terminal {
    name: &'static str,
    enabled: bool,
}

/// Terminal-enablement view of the routing graph.
///
/// Owns the enablement flags exclusively; [`sync`](RoutingGraph::sync)
/// applies only the flags whose hardware target differs from the tracked
/// value, then always commits (commit with zero changes is a no-op by
/// contract).
pub struct RoutingGraph {
    terminals: [Terminal; 4],
}

/// Target enablement for one terminal in a given headset state.
fn target(state: HeadsetState, name: &str) -> bool {
    match name {
        // Speaker and headset are mutually exclusive outputs.
        SPEAKER => !state.is_inserted(),
        // The headphone terminal and both mic paths stay powered; the jack
        // switches the analog path, not the terminal supplies.
        _ => true,
    }
}

impl RoutingGraph {
    /// Create the graph with every terminal enabled (power-on default).
    pub fn new() -> Self {
        Self {
            terminals: [
                Terminal { name: SPEAKER, enabled: true },
                Terminal { name: HEADPHONE, enabled: true },
                Terminal { name: HEADSET_MIC, enabled: true },
                Terminal { name: MAIN_MIC, enabled: true },
            ],
        }
    }

    /// Whether the named terminal is currently enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.terminals
            .iter()
            .any(|t| t.name == name && t.enabled)
    }

    /// Push the tracked enablement of every terminal to hardware and commit.
    ///
    /// Used once at bring-up so hardware matches the power-on defaults
    /// regardless of what the bootloader left behind.
    pub async fn seed<D: TerminalControl>(&mut self, dapm: &mut D) -> Result<(), MachineError> {
        for terminal in &self.terminals {
            dapm.set_terminal_enabled(terminal.name, terminal.enabled)
                .await
                .map_err(|_e| MachineError::HardwareIo)?;
        }
        dapm.commit().await.map_err(|_e| MachineError::HardwareIo)
    }

    /// Reconcile terminal enablement with the new headset state.
    ///
    /// Writes only the terminals whose target differs from the tracked
    /// value, then issues one commit. A failed write aborts the pass with
    /// the remaining terminals untouched; the tracked flags stay consistent
    /// with what was actually written.
    pub async fn sync<D: TerminalControl>(
        &mut self,
        state: HeadsetState,
        dapm: &mut D,
    ) -> Result<(), MachineError> {
        for terminal in &mut self.terminals {
            let want = target(state, terminal.name);
            if want == terminal.enabled {
                continue;
            }
            dapm.set_terminal_enabled(terminal.name, want)
                .await
                .map_err(|_e| MachineError::HardwareIo)?;
            terminal.enabled = want;
        }
        dapm.commit().await.map_err(|_e| MachineError::HardwareIo)
    }
}

impl Default for RoutingGraph {
    fn default() -> Self {
        Self::new()
    }
}
