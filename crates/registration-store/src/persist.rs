//! Persistence backends for the registration collection.

use crate::collection::Collection;
use crate::error::StoreError;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Domain separator mixed into the storage key.
const KEY_DERIVATION_PATH: &str = "registration-store/records";

/// Nonce size for AES-GCM (96 bits = 12 bytes).
const NONCE_SIZE: usize = 12;

/// Derive a 32-byte key: SHA256(secret || KEY_DERIVATION_PATH).
fn derive_key(secret: &SecretString) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(secret.expose_secret().as_bytes());
    hasher.update(KEY_DERIVATION_PATH.as_bytes());
    let hash = hasher.finalize();

    let mut key = [0u8; 32];
    key.copy_from_slice(&hash);
    key
}

/// Write `data` to `path` via a temp file and rename.
async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, data).await?;
    fs::rename(&temp_path, path).await?;
    Ok(())
}

/// Whether the directory holding `path` exists or can be created.
async fn directory_usable(path: &Path) -> bool {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await.is_ok()
        }
        _ => true,
    }
}

/// Plain JSON file storage.
pub struct FileStore {
    storage_path: PathBuf,
}

impl FileStore {
    pub fn new(storage_path: PathBuf) -> Self {
        Self { storage_path }
    }

    pub async fn save(&self, collection: &Collection) -> Result<(), StoreError> {
        let data = serde_json::to_vec(collection)?;
        write_atomic(&self.storage_path, &data).await?;

        debug!(
            "Saved registrations ({} bytes) to {:?}",
            data.len(),
            self.storage_path
        );
        Ok(())
    }

    /// Returns an empty collection if the file doesn't exist.
    pub async fn load(&self) -> Result<Collection, StoreError> {
        if !self.storage_path.exists() {
            info!(
                "Registration file not found at {:?}, starting empty",
                self.storage_path
            );
            return Ok(Collection::new());
        }

        let data = fs::read(&self.storage_path).await?;
        let collection: Collection = serde_json::from_slice(&data)?;

        info!(
            "Loaded {} registrations from {:?}",
            collection.count(),
            self.storage_path
        );
        Ok(collection)
    }
}

/// AES-256-GCM encrypted file storage.
pub struct EncryptedStore {
    storage_path: PathBuf,
    key: [u8; 32],
}

impl EncryptedStore {
    /// Create an encrypted store keyed from a configured secret.
    pub fn new(storage_path: PathBuf, secret: &SecretString) -> Self {
        Self {
            storage_path,
            key: derive_key(secret),
        }
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    /// Save the collection.
    ///
    /// File format: [12 bytes nonce][ciphertext with auth tag]
    pub async fn save(&self, collection: &Collection) -> Result<(), StoreError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let plaintext = serde_json::to_vec(collection)?;
        let ciphertext = self.cipher().encrypt(nonce, plaintext.as_ref())?;

        let mut data = nonce_bytes.to_vec();
        data.extend(ciphertext);

        write_atomic(&self.storage_path, &data).await?;

        debug!(
            "Saved encrypted registrations ({} bytes) to {:?}",
            data.len(),
            self.storage_path
        );
        Ok(())
    }

    /// Returns an empty collection if the file doesn't exist.
    pub async fn load(&self) -> Result<Collection, StoreError> {
        if !self.storage_path.exists() {
            info!(
                "Registration file not found at {:?}, starting empty",
                self.storage_path
            );
            return Ok(Collection::new());
        }

        let data = fs::read(&self.storage_path).await?;

        if data.len() < NONCE_SIZE {
            return Err(StoreError::Encryption(format!(
                "Registration file {:?} is truncated",
                self.storage_path
            )));
        }

        let nonce = Nonce::from_slice(&data[..NONCE_SIZE]);
        let plaintext = self
            .cipher()
            .decrypt(nonce, &data[NONCE_SIZE..])
            .map_err(|_| {
                StoreError::Encryption(
                    "Failed to decrypt registrations. Was the storage key changed?".to_string(),
                )
            })?;

        let collection: Collection = serde_json::from_slice(&plaintext)?;

        info!(
            "Loaded {} encrypted registrations from {:?}",
            collection.count(),
            self.storage_path
        );
        Ok(collection)
    }
}

/// In-memory store for testing or ephemeral deployments.
pub struct MemoryStore;

impl MemoryStore {
    /// "Save" does nothing for memory store.
    pub async fn save(&self, _collection: &Collection) -> Result<(), StoreError> {
        debug!("Memory store: save is a no-op");
        Ok(())
    }

    /// "Load" returns an empty collection.
    pub async fn load(&self) -> Result<Collection, StoreError> {
        debug!("Memory store: returning empty collection");
        Ok(Collection::new())
    }
}

/// Storage backend selected at start-up.
pub enum Store {
    /// Encrypted file storage
    Encrypted(EncryptedStore),
    /// Plain JSON file storage
    File(FileStore),
    /// In-memory only (no persistence)
    Memory(MemoryStore),
}

impl Store {
    /// File storage, encrypted when a key is supplied.
    pub fn file(storage_path: PathBuf, encryption_key: Option<&SecretString>) -> Self {
        match encryption_key {
            Some(secret) => {
                info!("Using encrypted file storage at {:?}", storage_path);
                Store::Encrypted(EncryptedStore::new(storage_path, secret))
            }
            None => {
                warn!(
                    "No storage encryption key configured, registrations at {:?} are stored in plain text",
                    storage_path
                );
                Store::File(FileStore::new(storage_path))
            }
        }
    }

    /// Force memory store.
    pub fn memory() -> Self {
        Store::Memory(MemoryStore)
    }

    /// Save the collection.
    pub async fn save(&self, collection: &Collection) -> Result<(), StoreError> {
        match self {
            Store::Encrypted(s) => s.save(collection).await,
            Store::File(s) => s.save(collection).await,
            Store::Memory(s) => s.save(collection).await,
        }
    }

    /// Load the collection.
    pub async fn load(&self) -> Result<Collection, StoreError> {
        match self {
            Store::Encrypted(s) => s.load().await,
            Store::File(s) => s.load().await,
            Store::Memory(s) => s.load().await,
        }
    }

    /// Whether the backend can currently be written to.
    pub async fn health_check(&self) -> bool {
        match self {
            Store::Encrypted(s) => directory_usable(&s.storage_path).await,
            Store::File(s) => directory_usable(&s.storage_path).await,
            Store::Memory(_) => true,
        }
    }
}
