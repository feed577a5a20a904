use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use common::TrfError;

use crate::Trf;

/// File extension of serialized models
pub const MODEL_EXTENSION: &str = "trf";

fn model_path(path: &Path) -> PathBuf {
    path.with_extension(MODEL_EXTENSION)
}

impl Trf {
    /// Serialize the full model state to `path`, forcing the `.trf`
    /// extension. Trained and untrained models round-trip alike.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TrfError> {
        let path = model_path(path.as_ref());
        info!("saving model to {}", path.display());
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Restore a model saved with [`Trf::save`]; the attribute set present
    /// at save time comes back exactly.
    pub fn load(path: impl AsRef<Path>) -> Result<Trf, TrfError> {
        let path = model_path(path.as_ref());
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use common::{Direction, Kind};
    use regularization::Regularization;

    use crate::trf::tests::filtered_pair;

    use super::*;

    #[test]
    fn round_trip_restores_every_attribute() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let (stim, resp) = filtered_pair(2, 90);
        let mut trf = Trf::new(Direction::Backward, Kind::Multi, false)
            .with_regularization(Regularization::Tikhonov);
        trf.train(&stim, &resp, 500.0, -10.0, 30.0, 0.5).unwrap();

        let path = std::env::temp_dir().join("trf_round_trip");
        trf.save(&path).unwrap();
        let restored = Trf::load(&path).unwrap();
        std::fs::remove_file(model_path(&path)).unwrap();

        assert_eq!(restored.direction, trf.direction);
        assert_eq!(restored.kind, trf.kind);
        assert_eq!(restored.zeropad, trf.zeropad);
        assert_eq!(restored.regularization, trf.regularization);
        assert_eq!(restored.fs(), trf.fs());
        assert_eq!(restored.times().unwrap(), trf.times().unwrap());
        // serde_json prints floats in shortest round-trip form, so the
        // restored weights are bit-exact
        assert_eq!(restored.weights().unwrap(), trf.weights().unwrap());
        assert_eq!(restored.bias().unwrap(), trf.bias().unwrap());
    }

    #[test]
    fn extension_is_forced() {
        let path = model_path(Path::new("/tmp/model.json"));
        assert_eq!(path.extension().unwrap(), MODEL_EXTENSION);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let missing = std::env::temp_dir().join("no_such_model");
        assert!(matches!(Trf::load(missing), Err(TrfError::Io(_))));
    }
}
