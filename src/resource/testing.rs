use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{KeyResource, KeySpec};
use crate::client::{
    ApiError, CreateKeyRequest, HpcsEndpointApi, HpcsEndpoints, Key, KeyEndpoint,
    KeyManagementApi, KmsHosts, ResourceControllerApi, ServiceInstance,
};
use crate::session::ClientSession;

pub(crate) const INSTANCE_ID: &str = "inst-1";
pub(crate) const KMS_BASE: &str = "https://us-south.kms.cloud.ibm.com";
pub(crate) const CONSOLE: &str = "https://cloud.ibm.com";

/// In-memory keys API that mints CRNs for the service it pretends to be
pub(crate) struct MockKeyManagement {
    pub(crate) service: &'static str,
    pub(crate) keys: Mutex<HashMap<String, Key>>,
    pub(crate) created: Mutex<Vec<(KeyEndpoint, CreateKeyRequest)>>,
    pub(crate) deleted: Mutex<Vec<(KeyEndpoint, String, bool)>>,
    pub(crate) get_endpoints: Mutex<Vec<KeyEndpoint>>,
    pub(crate) get_error: Mutex<Option<ApiError>>,
    pub(crate) create_error: Mutex<Option<ApiError>>,
}

impl MockKeyManagement {
    pub(crate) fn new(service: &'static str) -> Self {
        Self {
            service,
            keys: Mutex::new(HashMap::new()),
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            get_endpoints: Mutex::new(Vec::new()),
            get_error: Mutex::new(None),
            create_error: Mutex::new(None),
        }
    }

    pub(crate) fn remove_all(&self) {
        self.keys.lock().unwrap().clear();
    }
}

#[async_trait]
impl KeyManagementApi for MockKeyManagement {
    async fn create_key(
        &self,
        endpoint: &KeyEndpoint,
        request: &CreateKeyRequest,
    ) -> Result<Key, ApiError> {
        if let Some(err) = self.create_error.lock().unwrap().clone() {
            return Err(err);
        }

        let mut keys = self.keys.lock().unwrap();
        let id = format!("key-{}", keys.len() + 1);
        let key = Key {
            id: id.clone(),
            name: request.name.clone(),
            state: Some(1),
            extractable: request.extractable,
            crn: format!(
                "crn:v1:bluemix:public:{}:us-south:a/acct:{}:key:{}",
                self.service, endpoint.instance_id, id
            ),
            payload: if request.extractable {
                request.payload.clone()
            } else {
                None
            },
            imported: Some(request.payload.is_some()),
            ..Key::default()
        };
        keys.insert(id, key.clone());

        self.created
            .lock()
            .unwrap()
            .push((endpoint.clone(), request.clone()));
        Ok(key)
    }

    async fn get_key(&self, endpoint: &KeyEndpoint, key_id: &str) -> Result<Key, ApiError> {
        self.get_endpoints.lock().unwrap().push(endpoint.clone());

        if let Some(err) = self.get_error.lock().unwrap().clone() {
            return Err(err);
        }

        self.keys
            .lock()
            .unwrap()
            .get(key_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Key does not exist"))
    }

    async fn delete_key(
        &self,
        endpoint: &KeyEndpoint,
        key_id: &str,
        force: bool,
    ) -> Result<Option<Key>, ApiError> {
        self.deleted
            .lock()
            .unwrap()
            .push((endpoint.clone(), key_id.to_string(), force));

        match self.keys.lock().unwrap().remove(key_id) {
            Some(key) => Ok(Some(key)),
            None => Err(ApiError::not_found("Key does not exist")),
        }
    }
}

pub(crate) struct MockHpcs {
    pub(crate) lookups: Mutex<Vec<String>>,
}

#[async_trait]
impl HpcsEndpointApi for MockHpcs {
    async fn get_api_endpoint(&self, instance_id: &str) -> Result<HpcsEndpoints, ApiError> {
        self.lookups.lock().unwrap().push(instance_id.to_string());
        Ok(HpcsEndpoints {
            instance_id: Some(instance_id.to_string()),
            kms: KmsHosts {
                public: "api.us-south.hs-crypto.cloud.ibm.com:8992".to_string(),
                private: "api.private.us-south.hs-crypto.cloud.ibm.com:8992".to_string(),
            },
        })
    }
}

pub(crate) struct MockResourceController {
    pub(crate) service: &'static str,
}

#[async_trait]
impl ResourceControllerApi for MockResourceController {
    async fn get_instance(&self, instance_id: &str) -> Result<ServiceInstance, ApiError> {
        let crn = format!(
            "crn:v1:bluemix:public:{}:us-south:a/acct:{}::",
            self.service, instance_id
        );
        Ok(ServiceInstance {
            id: crn.clone(),
            guid: instance_id.to_string(),
            name: "test-instance".to_string(),
            crn,
            state: Some("active".to_string()),
            resource_group_id: None,
        })
    }
}

pub(crate) struct Harness {
    pub(crate) resource: KeyResource,
    pub(crate) kms: Arc<MockKeyManagement>,
    pub(crate) hpcs: Arc<MockHpcs>,
}

pub(crate) fn harness(service: &'static str) -> Harness {
    let kms = Arc::new(MockKeyManagement::new(service));
    let hpcs = Arc::new(MockHpcs {
        lookups: Mutex::new(Vec::new()),
    });
    let session = ClientSession::new(KMS_BASE, CONSOLE)
        .with_key_management(kms.clone())
        .with_hpcs_endpoint(hpcs.clone())
        .with_resource_controller(Arc::new(MockResourceController { service }));

    Harness {
        resource: KeyResource::new(session),
        kms,
        hpcs,
    }
}

pub(crate) fn spec(standard_key: bool) -> KeySpec {
    KeySpec {
        instance_id: INSTANCE_ID.to_string(),
        key_name: "my-key".to_string(),
        standard_key,
        ..KeySpec::default()
    }
}
