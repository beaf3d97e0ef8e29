//! Shared in-memory port implementations for use case tests
//!
//! `ScriptedRemote` simulates the cloud provider with controllable
//! failures; `InMemoryMirror` is a HashMap-backed mirror store. Both are
//! test-only and take the same port contracts the real adapters implement.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use crate::domain::entity::{EntityKind, RemoteEntity};
use crate::domain::errors::{AdapterError, SoftOutcome};
use crate::domain::newtypes::{InstanceName, LocalId, RemoteId};
use crate::ports::mirror_store::IMirrorStore;
use crate::ports::remote_store::{DownloadedContent, EntityDescriptor, IRemoteStore};

pub const ROOT_ID: &str = "root";

fn descriptor(id: &str, name: &str, parent: &str, is_folder: bool) -> EntityDescriptor {
    EntityDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: None,
        size: if is_folder { None } else { Some(128) },
        parent_id: Some(parent.to_string()),
        is_folder,
        trashed: false,
        modified: None,
        created_by: None,
    }
}

// ============================================================================
// ScriptedRemote
// ============================================================================

/// Remote store double with a scriptable failure surface
#[derive(Default)]
pub struct ScriptedRemote {
    descriptors: Mutex<HashMap<String, EntityDescriptor>>,
    children: Mutex<HashMap<String, Vec<String>>>,
    /// When set, create/upload calls fail at the transport level
    pub fail_creates: AtomicBool,
    /// When set, list calls fail at the transport level
    pub fail_lists: AtomicBool,
    fail_delete: Mutex<HashSet<String>>,
    deleted: Mutex<Vec<String>>,
    moved: Mutex<Vec<(String, String)>>,
    next_id: AtomicU32,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&self, id: &str, name: &str, parent: &str) {
        self.insert(descriptor(id, name, parent, true));
    }

    pub fn add_file(&self, id: &str, name: &str, parent: &str) {
        self.insert(descriptor(id, name, parent, false));
    }

    fn insert(&self, desc: EntityDescriptor) {
        let parent = desc.parent_id.clone().unwrap_or_else(|| ROOT_ID.to_string());
        self.children
            .lock()
            .unwrap()
            .entry(parent)
            .or_default()
            .push(desc.id.clone());
        self.descriptors.lock().unwrap().insert(desc.id.clone(), desc);
    }

    /// Make deleting the given id fail with a 500
    pub fn fail_delete_of(&self, id: &str) {
        self.fail_delete.lock().unwrap().insert(id.to_string());
    }

    /// Ids deleted so far, in call order
    pub fn deleted_order(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    /// Recorded (id, new_parent) move calls
    pub fn moves(&self) -> Vec<(String, String)> {
        self.moved.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IRemoteStore for ScriptedRemote {
    fn root_id(&self) -> RemoteId {
        RemoteId::new(ROOT_ID.to_string()).unwrap()
    }

    async fn list_children(
        &self,
        parent: Option<&RemoteId>,
        search: Option<&str>,
    ) -> Result<Vec<EntityDescriptor>, AdapterError> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(AdapterError::RemoteUnavailable(
                "scripted transport failure".to_string(),
            ));
        }
        let parent = parent.map_or(ROOT_ID.to_string(), |p| p.as_str().to_string());
        let children = self.children.lock().unwrap();
        let descriptors = self.descriptors.lock().unwrap();
        let mut out = Vec::new();
        for id in children.get(&parent).cloned().unwrap_or_default() {
            if let Some(desc) = descriptors.get(&id) {
                let matches = match search {
                    None => true,
                    Some(term) => desc.name.to_lowercase().contains(&term.to_lowercase()),
                };
                if matches {
                    out.push(desc.clone());
                }
            }
        }
        Ok(out)
    }

    async fn get_metadata(&self, id: &RemoteId) -> Result<EntityDescriptor, AdapterError> {
        self.descriptors
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| AdapterError::from_status(404, format!("{id} not found")))
    }

    async fn create_folder(
        &self,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<EntityDescriptor, AdapterError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(AdapterError::RemoteUnavailable(
                "scripted transport failure".to_string(),
            ));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let parent = parent.map_or(ROOT_ID.to_string(), |p| p.as_str().to_string());
        let desc = descriptor(&format!("rf-{n}"), name, &parent, true);
        self.insert(desc.clone());
        Ok(desc)
    }

    async fn upload(
        &self,
        name: &str,
        parent: Option<&RemoteId>,
        content: Vec<u8>,
        _mime_type: &str,
    ) -> Result<EntityDescriptor, AdapterError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(AdapterError::RemoteUnavailable(
                "scripted transport failure".to_string(),
            ));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let parent = parent.map_or(ROOT_ID.to_string(), |p| p.as_str().to_string());
        let mut desc = descriptor(&format!("up-{n}"), name, &parent, false);
        desc.size = Some(content.len() as u64);
        self.insert(desc.clone());
        Ok(desc)
    }

    async fn download(&self, id: &RemoteId) -> Result<DownloadedContent, AdapterError> {
        let desc = self.get_metadata(id).await?;
        Ok(DownloadedContent {
            bytes: b"scripted".to_vec(),
            file_name: desc.name,
            mime_type: "application/octet-stream".to_string(),
        })
    }

    async fn delete(&self, id: &RemoteId) -> Result<(), AdapterError> {
        if self.fail_delete.lock().unwrap().contains(id.as_str()) {
            return Err(AdapterError::from_status(500, "scripted delete failure"));
        }
        self.deleted.lock().unwrap().push(id.as_str().to_string());
        self.descriptors.lock().unwrap().remove(id.as_str());
        for children in self.children.lock().unwrap().values_mut() {
            children.retain(|c| c != id.as_str());
        }
        Ok(())
    }

    async fn move_entity(
        &self,
        id: &RemoteId,
        new_parent: &RemoteId,
    ) -> Result<(), AdapterError> {
        self.moved
            .lock()
            .unwrap()
            .push((id.as_str().to_string(), new_parent.as_str().to_string()));
        Ok(())
    }

    async fn rename(&self, _id: &RemoteId, _new_name: &str) -> Result<SoftOutcome, AdapterError> {
        Ok(SoftOutcome::Applied)
    }

    async fn set_trashed(
        &self,
        _id: &RemoteId,
        _trashed: bool,
    ) -> Result<SoftOutcome, AdapterError> {
        Ok(SoftOutcome::Applied)
    }
}

// ============================================================================
// InMemoryMirror
// ============================================================================

/// HashMap-backed mirror store
#[derive(Default)]
pub struct InMemoryMirror {
    rows: Mutex<HashMap<String, RemoteEntity>>,
    settings: Mutex<HashMap<String, String>>,
}

impl InMemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl IMirrorStore for InMemoryMirror {
    async fn upsert_remote(
        &self,
        descriptor: &EntityDescriptor,
        parent_ref: Option<LocalId>,
    ) -> Result<RemoteEntity, AdapterError> {
        let mut rows = self.rows.lock().unwrap();
        let entity = match rows.get_mut(&descriptor.id) {
            Some(existing) => {
                existing.name = descriptor.name.clone();
                existing.parent_ref = parent_ref;
                existing.size = descriptor.size;
                existing.mime_type = descriptor.mime_type.clone();
                existing.is_trashed = descriptor.trashed;
                existing.is_local_only = false;
                existing.is_inconsistent = false;
                existing.clone()
            }
            None => {
                let remote_id = RemoteId::new(descriptor.id.clone())
                    .map_err(|e| AdapterError::Mirror(e.to_string()))?;
                let kind = if descriptor.is_folder {
                    EntityKind::Folder
                } else {
                    EntityKind::File
                };
                let mut entity =
                    RemoteEntity::from_remote(remote_id, descriptor.name.clone(), kind, parent_ref);
                entity.size = descriptor.size;
                entity.mime_type = descriptor.mime_type.clone();
                entity.is_trashed = descriptor.trashed;
                rows.insert(descriptor.id.clone(), entity.clone());
                entity
            }
        };
        Ok(entity)
    }

    async fn insert_local_only(
        &self,
        name: &str,
        kind: EntityKind,
        parent_ref: Option<LocalId>,
    ) -> Result<RemoteEntity, AdapterError> {
        let entity = RemoteEntity::local_only(name.to_string(), kind, parent_ref);
        self.rows
            .lock()
            .unwrap()
            .insert(entity.remote_id.as_str().to_string(), entity.clone());
        Ok(entity)
    }

    async fn upsert_instance(&self, name: &InstanceName) -> Result<RemoteEntity, AdapterError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.get(name.as_str()) {
            return Ok(existing.clone());
        }
        let remote_id = RemoteId::new(name.as_str().to_string())
            .map_err(|e| AdapterError::Mirror(e.to_string()))?;
        let entity = RemoteEntity::from_remote(
            remote_id,
            name.as_str().to_string(),
            EntityKind::MessagingInstance,
            None,
        );
        rows.insert(name.as_str().to_string(), entity.clone());
        Ok(entity)
    }

    async fn find_by_remote_id(
        &self,
        remote_id: &RemoteId,
    ) -> Result<Option<RemoteEntity>, AdapterError> {
        Ok(self.rows.lock().unwrap().get(remote_id.as_str()).cloned())
    }

    async fn find_by_local_id(&self, id: &LocalId) -> Result<Option<RemoteEntity>, AdapterError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|e| e.local_id == *id)
            .cloned())
    }

    async fn children_of(
        &self,
        parent_ref: Option<&LocalId>,
    ) -> Result<Vec<RemoteEntity>, AdapterError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.parent_ref.as_ref() == parent_ref && e.is_listed())
            .cloned()
            .collect())
    }

    async fn set_trashed(&self, remote_id: &RemoteId, trashed: bool) -> Result<(), AdapterError> {
        if let Some(entity) = self.rows.lock().unwrap().get_mut(remote_id.as_str()) {
            if trashed {
                entity.trash();
            } else {
                entity.restore();
            }
        }
        Ok(())
    }

    async fn set_parent(
        &self,
        remote_id: &RemoteId,
        parent_ref: Option<LocalId>,
    ) -> Result<(), AdapterError> {
        if let Some(entity) = self.rows.lock().unwrap().get_mut(remote_id.as_str()) {
            entity.parent_ref = parent_ref;
        }
        Ok(())
    }

    async fn mark_inconsistent(
        &self,
        remote_id: &RemoteId,
        inconsistent: bool,
    ) -> Result<(), AdapterError> {
        if let Some(entity) = self.rows.lock().unwrap().get_mut(remote_id.as_str()) {
            entity.is_inconsistent = inconsistent;
        }
        Ok(())
    }

    async fn get_setting(&self, key: &str) -> Result<Option<String>, AdapterError> {
        Ok(self.settings.lock().unwrap().get(key).cloned())
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<(), AdapterError> {
        self.settings
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
