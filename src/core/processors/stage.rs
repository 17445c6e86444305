use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::maven::PathLayout;

use super::classpath::build_processor_classpath;
use super::data::{resolve_coordinate, resolve_placeholder};
use super::profile::{InstallProfile, Processor};

/// The four client processors Forge's installer runs, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    InstallerTools,
    JarSplitter,
    SpecialSource,
    BinaryPatcher,
}

/// Where the value following a recognized flag comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgSource {
    /// `{KEY}` placeholder resolved through install data.
    Data,
    /// Bracketed coordinate given inline.
    Coordinate(PathLayout),
    /// Fixed value, whatever the profile says.
    Literal(&'static str),
    /// The extracted client patch.
    TempArtifact,
    /// `<common>/versions/<v>/<v>.jar`
    BaseGameJar,
}

impl Stage {
    pub const ORDER: [Stage; 4] = [
        Stage::InstallerTools,
        Stage::JarSplitter,
        Stage::SpecialSource,
        Stage::BinaryPatcher,
    ];

    pub fn main_class(self) -> &'static str {
        match self {
            Stage::InstallerTools => "net.minecraftforge.installertools.ConsoleTool",
            Stage::JarSplitter => "net.minecraftforge.jarsplitter.ConsoleTool",
            Stage::SpecialSource => "net.md_5.specialsource.SpecialSource",
            Stage::BinaryPatcher => "net.minecraftforge.binarypatcher.ConsoleTool",
        }
    }

    fn arg_source(self, flag: &str) -> Option<ArgSource> {
        let source = match (self, flag) {
            (Stage::InstallerTools, "--task") => ArgSource::Literal("MCP_DATA"),
            (Stage::InstallerTools, "--input") => ArgSource::Coordinate(PathLayout::Standard),
            (Stage::InstallerTools, "--output") => ArgSource::Data,
            (Stage::InstallerTools, "--key") => ArgSource::Literal("mappings"),

            (Stage::JarSplitter, "--input") => ArgSource::BaseGameJar,
            (Stage::JarSplitter, "--slim" | "--extra" | "--srg") => ArgSource::Data,

            (Stage::SpecialSource, "--in-jar" | "--out-jar" | "--srg-in") => ArgSource::Data,

            (Stage::BinaryPatcher, "--clean" | "--output") => ArgSource::Data,
            (Stage::BinaryPatcher, "--apply") => ArgSource::TempArtifact,

            _ => return None,
        };
        Some(source)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::InstallerTools => write!(f, "installertools"),
            Stage::JarSplitter => write!(f, "jarsplitter"),
            Stage::SpecialSource => write!(f, "specialsource"),
            Stage::BinaryPatcher => write!(f, "binarypatcher"),
        }
    }
}

/// Everything a stage builder reads. Borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub profile: &'a InstallProfile,
    pub libraries_root: &'a Path,
    pub common_root: &'a Path,
    pub minecraft_version: &'a str,
    pub temp_artifact: &'a Path,
    pub classpath_separator: &'a str,
}

impl StageContext<'_> {
    pub fn base_game_jar(&self) -> PathBuf {
        self.common_root
            .join("versions")
            .join(self.minecraft_version)
            .join(format!("{}.jar", self.minecraft_version))
    }
}

/// Argument vector for one processor run, without the Java executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    pub stage: Stage,
    pub tokens: Vec<String>,
}

/// Build `["-cp", <classpath>, <main class>, flag value ...]` for `stage`.
///
/// Arguments are read as `(flag, value)` pairs. Flags the stage recognizes
/// get their value substituted; any other flag is copied and its value
/// dropped.
pub fn build_stage_command(
    stage: Stage,
    processor: &Processor,
    ctx: &StageContext<'_>,
) -> LauncherResult<StageCommand> {
    let classpath = build_processor_classpath(
        ctx.profile,
        processor,
        ctx.libraries_root,
        ctx.classpath_separator,
    )?;

    let mut tokens = vec!["-cp".to_string(), classpath, stage.main_class().to_string()];

    let mut args = processor.args.iter();
    while let Some(flag) = args.next() {
        let value = args.next();
        tokens.push(flag.clone());

        let Some(source) = stage.arg_source(flag) else {
            continue;
        };

        let resolved = match (source, value) {
            (ArgSource::Literal(literal), _) => literal.to_string(),
            (ArgSource::TempArtifact, _) => path_arg(ctx.temp_artifact),
            (ArgSource::BaseGameJar, _) => path_arg(&ctx.base_game_jar()),
            (ArgSource::Data, Some(raw)) => {
                path_arg(&resolve_placeholder(ctx.profile, raw, ctx.libraries_root)?)
            }
            (ArgSource::Coordinate(layout), Some(raw)) => {
                path_arg(&resolve_coordinate(raw, layout, ctx.libraries_root)?)
            }
            (ArgSource::Data | ArgSource::Coordinate(_), None) => {
                return Err(LauncherError::UnresolvedCoordinate(format!(
                    "{} {} is missing its value",
                    stage, flag
                )));
            }
        };
        tokens.push(resolved);
    }

    Ok(StageCommand { stage, tokens })
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::processors::profile::fixtures;

    fn context<'a>(profile: &'a InstallProfile) -> StageContext<'a> {
        StageContext {
            profile,
            libraries_root: Path::new("/libs"),
            common_root: Path::new("/common"),
            minecraft_version: "1.16.5",
            temp_artifact: Path::new("/tmp/client.lzma"),
            classpath_separator: ";",
        }
    }

    fn value_after<'a>(tokens: &'a [String], flag: &str) -> &'a str {
        let idx = tokens.iter().position(|t| t == flag).unwrap();
        &tokens[idx + 1]
    }

    #[test]
    fn installertools_scenario() {
        let profile = InstallProfile::from_value(serde_json::json!({
            "libraries": [{
                "name": "net.minecraftforge:installertools:1.2",
                "downloads": { "artifact": {
                    "path": "net/minecraftforge/installertools/1.2/installertools-1.2.jar"
                }}
            }],
            "processors": [{
                "jar": "net.minecraftforge:installertools:1.2",
                "classpath": [],
                "args": ["--task", "x", "--input", "[net.mc:client:1.0]", "--output", "{MAPPINGS}"]
            }],
            "data": { "MAPPINGS": { "client": "[net.mc:client:1.0:mappings@txt]" } }
        }))
        .unwrap();

        let ctx = context(&profile);
        let cmd = build_stage_command(Stage::InstallerTools, &profile.processors[0], &ctx).unwrap();

        assert_eq!(cmd.tokens[0], "-cp");
        assert!(cmd.tokens[1].ends_with("installertools-1.2.jar"));
        assert_eq!(cmd.tokens[2], "net.minecraftforge.installertools.ConsoleTool");
        assert_eq!(value_after(&cmd.tokens, "--task"), "MCP_DATA");
        assert_eq!(
            Path::new(value_after(&cmd.tokens, "--input")),
            Path::new("/libs").join("net/mc/client/1.0/client-1.0.jar")
        );
        assert!(value_after(&cmd.tokens, "--output").ends_with("-mappings.txt"));
        assert_eq!(cmd.tokens.len(), 9);
    }

    #[test]
    fn jarsplitter_input_is_base_game_jar() {
        let profile = InstallProfile::from_value(fixtures::forge_profile_json()).unwrap();
        let ctx = context(&profile);
        let cmd = build_stage_command(Stage::JarSplitter, &profile.processors[1], &ctx).unwrap();

        assert_eq!(
            Path::new(value_after(&cmd.tokens, "--input")),
            Path::new("/common/versions/1.16.5/1.16.5.jar")
        );
        assert!(value_after(&cmd.tokens, "--slim").ends_with("-slim.jar"));
        assert!(value_after(&cmd.tokens, "--extra").ends_with("-extra.jar"));
        assert!(value_after(&cmd.tokens, "--srg").ends_with("-mappings.txt"));
    }

    #[test]
    fn binarypatcher_applies_temp_artifact() {
        let profile = InstallProfile::from_value(fixtures::forge_profile_json()).unwrap();
        let ctx = context(&profile);
        let cmd = build_stage_command(Stage::BinaryPatcher, &profile.processors[3], &ctx).unwrap();

        assert_eq!(value_after(&cmd.tokens, "--apply"), "/tmp/client.lzma");
        assert!(value_after(&cmd.tokens, "--clean").ends_with("-srg.jar"));
        assert!(value_after(&cmd.tokens, "--output").ends_with("forge-1.16.5-36.2.0-client.jar"));
    }

    #[test]
    fn unrecognized_flag_is_copied_without_value() {
        let profile = InstallProfile::from_value(fixtures::forge_profile_json()).unwrap();
        let mut processor = profile.processors[2].clone();
        processor.args.extend(["--live".to_string(), "true".to_string()]);

        let cmd = build_stage_command(Stage::SpecialSource, &processor, &context(&profile)).unwrap();

        assert_eq!(cmd.tokens.last().map(String::as_str), Some("--live"));
        assert!(!cmd.tokens.iter().any(|t| t == "true"));
    }

    #[test]
    fn trailing_data_flag_without_value_fails() {
        let profile = InstallProfile::from_value(fixtures::forge_profile_json()).unwrap();
        let mut processor = profile.processors[2].clone();
        processor.args = vec!["--in-jar".into()];

        let err = build_stage_command(Stage::SpecialSource, &processor, &context(&profile))
            .unwrap_err();
        assert!(matches!(err, LauncherError::UnresolvedCoordinate(_)));
    }

    #[test]
    fn builder_is_pure() {
        let profile = InstallProfile::from_value(fixtures::forge_profile_json()).unwrap();
        let ctx = context(&profile);
        let first = build_stage_command(Stage::SpecialSource, &profile.processors[2], &ctx).unwrap();
        let second = build_stage_command(Stage::SpecialSource, &profile.processors[2], &ctx).unwrap();
        assert_eq!(first, second);
    }
}
