mod did;
mod did_document;
mod did_document_metadata;
mod did_lifecycle_coordinator;
mod did_message;
mod did_resolution_result;
mod entity_id;
mod error;
pub mod key_codec;
mod key_material;
mod key_purpose;
mod ledger_client;
mod ledger_client_config;
mod ledger_transaction;
mod network;
mod public_key_material;
mod resolution_format;
mod service;
mod update_operation;
mod update_operation_builder;
mod verification_method;
pub mod verification_method_selector;

pub use crate::{
    did::DID,
    did_document::{DIDDocument, DID_CORE_CONTEXT},
    did_document_metadata::DIDDocumentMetadata,
    did_lifecycle_coordinator::{DIDLifecycleCoordinator, DID_TOPIC_MEMO},
    did_message::{DIDMessage, DIDOperation, SignedDIDMessage},
    did_resolution_result::{DIDResolutionMetadata, DIDResolutionResult},
    entity_id::{AccountId, EntityId, TopicId},
    error::Error,
    key_material::KeyMaterial,
    key_purpose::KeyPurpose,
    ledger_client::LedgerClient,
    ledger_client_config::LedgerClientConfig,
    ledger_transaction::{LedgerReceipt, LedgerRecord, LedgerTransaction},
    network::Network,
    public_key_material::{absolute_reference, PublicKeyMaterial},
    resolution_format::ResolutionFormat,
    service::Service,
    update_operation::UpdateOperation,
    update_operation_builder::{UpdateOperationBuilder, UpdateOperations},
    verification_method::{
        VerificationMethod, DID_ROOT_KEY_FRAGMENT, ED25519_VERIFICATION_KEY_2020,
    },
};

pub type Result<T> = std::result::Result<T, Error>;
