// ─── Forge processors ───
// Builds and runs the installertools → jarsplitter → SpecialSource →
// binarypatcher chain that turns a vanilla client into Forge's patched jar.

pub mod classpath;
pub mod data;
pub mod outputs;
pub mod pipeline;
pub mod profile;
pub mod runner;
pub mod stage;

pub use pipeline::{install, remove_temp_artifact, CleanupPolicy, InstallerPipeline, PipelineOptions};
pub use profile::InstallProfile;
pub use runner::{CompletionPolicy, JavaProcessRunner, ProcessRunner, StageExit};
pub use stage::{build_stage_command, Stage, StageCommand, StageContext};
