use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use super::state::StateFile;
use crate::cli::UpdateArgs;
use crate::config::TimeoutConfig;
use crate::errors::KeyControllerError;
use crate::resource::{KeyResource, KeyResourceData, KeySpec};

/// Runs lifecycle operations against the record kept in a state file
pub struct KeyManagementService {
    resource: KeyResource,
    state: StateFile,
    timeouts: TimeoutConfig,
}

impl KeyManagementService {
    pub fn new(resource: KeyResource, state: StateFile, timeouts: TimeoutConfig) -> Self {
        Self {
            resource,
            state,
            timeouts,
        }
    }

    /// Create the key and record it. Refuses to overwrite a record that still has an ID.
    pub async fn create(&self, spec: KeySpec) -> Result<KeyResourceData, KeyControllerError> {
        if self.state.exists() && self.state.load()?.id().is_some() {
            return Err(KeyControllerError::InvalidRequest(format!(
                "{} already records a key; delete it or use another --state file",
                self.state.path().display()
            )));
        }

        if spec.payload().is_some() {
            warn!("⚠️  Key material will be stored in the state file {}", self.state.path().display());
        }

        let mut data = KeyResourceData::from_spec(spec);
        let result = with_timeout(self.timeouts.create_secs, self.resource.create(&mut data)).await;

        // A key that was created but not read back must still be recorded
        if data.id().is_some() {
            self.state.save(&data)?;
        }
        result?;

        Ok(data)
    }

    pub async fn read(&self) -> Result<KeyResourceData, KeyControllerError> {
        let mut data = self.state.load()?;
        self.resource.read(&mut data).await?;
        self.state.save(&data)?;
        Ok(data)
    }

    pub async fn update(&self, args: &UpdateArgs) -> Result<KeyResourceData, KeyControllerError> {
        let mut data = self.state.load()?;
        let desired = args.desired(data.spec());

        with_timeout(
            self.timeouts.update_secs,
            self.resource.update(&mut data, &desired),
        )
        .await?;

        self.state.save(&data)?;
        Ok(data)
    }

    /// Delete the key, then the state file
    pub async fn delete(&self) -> Result<(), KeyControllerError> {
        let mut data = self.state.load()?;
        self.resource.delete(&mut data).await?;
        self.state.remove()?;
        info!("State file {} removed", self.state.path().display());
        Ok(())
    }

    pub async fn exists(&self) -> Result<bool, KeyControllerError> {
        let data = self.state.load()?;
        self.resource.exists(&data).await
    }

    pub async fn import(&self, crn: &str) -> Result<KeyResourceData, KeyControllerError> {
        if self.state.exists() && self.state.load()?.id().is_some() {
            return Err(KeyControllerError::InvalidRequest(format!(
                "{} already records a key",
                self.state.path().display()
            )));
        }

        let data = self.resource.import(crn).await?;
        self.state.save(&data)?;
        Ok(data)
    }

    /// `None` when the key no longer exists; the record is kept with its ID cleared
    pub async fn refresh(&self) -> Result<Option<KeyResourceData>, KeyControllerError> {
        let mut data = self.state.load()?;
        let found = self.resource.refresh(&mut data).await?;
        self.state.save(&data)?;
        Ok(found.then_some(data))
    }
}

async fn with_timeout<T>(
    secs: u64,
    operation: impl Future<Output = Result<T, KeyControllerError>>,
) -> Result<T, KeyControllerError> {
    tokio::time::timeout(Duration::from_secs(secs), operation)
        .await
        .map_err(|_| KeyControllerError::Timeout(secs))?
}
