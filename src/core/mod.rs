// ─── Mod-loader install core ───
//
// Architecture:
//   core/
//     maven/      — Coordinate parser + library path layouts
//     processors/ — Forge install profile, stage builders, process pipeline
//     loaders/    — Forge / Fabric handlers + descriptor dispatcher
//     state/      — Data directory layout and installer settings
//     setup       — Dispatch, then run processors when Forge needs them

pub mod error;
pub mod loaders;
pub mod maven;
pub mod processors;
pub mod setup;
pub mod state;
