//! Definition of command line arguments

use clap::Parser;

pub use clap_verbosity_flag::Verbosity;

use crate::{scenes::SceneType, DEFAULT_MAX_LEAF_SIZE};

/// Parses the commandline arguments into an [Arguments] struct
pub fn parse_args() -> Arguments {
    Arguments::parse()
}

/// Build a BVH over a generated scene and optionally write the packed buffers
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Arguments {
    /// The scene whose triangles are fed to the builder
    #[clap(short, long, value_enum, default_value_t = SceneType::CornellBox)]
    pub scene: SceneType,

    /// Number of triangles of the random scene
    #[clap(
        short = 'n',
        long = "triangles",
        value_parser = valid_count::<usize>,
        default_value_t = 10_000,
        value_name = "NUM"
    )]
    pub triangle_count: usize,

    /// Maximum number of primitives in a leaf
    ///
    /// Leaves only exceed it when their primitives can't be told apart
    #[clap(
        short = 'l',
        long,
        value_parser = valid_count::<usize>,
        default_value_t = DEFAULT_MAX_LEAF_SIZE,
        value_name = "NUM"
    )]
    pub max_leaf_size: usize,

    /// The seed used for psuedorandom number generation
    #[clap(long)]
    pub seed: Option<u64>,

    /// Prefix of the files receiving the packed buffers
    ///
    /// Writes `<PREFIX>.tris.bin` (5 vec4 per triangle) and `<PREFIX>.nodes.bin` (3 vec4 per node)
    #[clap(short, long, value_name = "PREFIX")]
    pub output: Option<std::path::PathBuf>,

    /// Check the hierarchy invariants after building
    #[clap(long)]
    pub validate: bool,

    #[clap(flatten)]
    pub verbosity: self::Verbosity,
}

/// Checks whether the given integer value is greater than 0
fn valid_count<T>(s: &str) -> Result<T, String>
where
    T: std::str::FromStr + PartialOrd + Default,
    <T as std::str::FromStr>::Err: std::fmt::Display,
{
    match s.parse::<T>() {
        Ok(count) => {
            if count > T::default() {
                Ok(count)
            } else {
                Err("count must be greater than 0".to_string())
            }
        }
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_cli() {
        use clap::CommandFactory;
        Arguments::command().debug_assert()
    }

    #[test]
    fn defaults() {
        let args = Arguments::try_parse_from(["bvh-build"]).unwrap();
        assert_eq!(args.scene, SceneType::CornellBox);
        assert_eq!(args.max_leaf_size, DEFAULT_MAX_LEAF_SIZE);
        assert!(args.output.is_none());
        assert!(!args.validate);
    }

    #[test]
    fn zero_leaf_size_is_rejected() {
        use clap::CommandFactory;
        let res = Arguments::command().try_get_matches_from(["bvh-build", "--max-leaf-size", "0"]);

        assert!(res.is_err(), "Expected an error during argument parsing");

        assert_eq!(
            res.as_ref().unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation,
            "Expected a count validation error"
        );
    }

    #[test]
    fn random_scene_args() {
        let args = Arguments::try_parse_from([
            "bvh-build", "--scene", "random", "-n", "500", "-l", "4", "--seed", "3",
        ])
        .unwrap();
        assert_eq!(args.scene, SceneType::Random);
        assert_eq!(args.triangle_count, 500);
        assert_eq!(args.max_leaf_size, 4);
        assert_eq!(args.seed, Some(3));
    }
}
