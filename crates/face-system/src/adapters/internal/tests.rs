use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{Data, FacePersistency, Interest, Packet};
use toml::Table;

use super::*;
use crate::adapters::TlvPacketDecoder;
use crate::domain::{ConfigContext, ConfigSection, FaceUri};
use crate::error::{ConfigError, CreationError};
use crate::ports::{CreateFaceCompletion, CreateFaceRequest, PacketDecoder, ProtocolFactory};
use crate::service::Face;

type Outcome = Arc<Mutex<Option<Result<Face, CreationError>>>>;

fn section(text: &str) -> ConfigSection {
    ConfigSection::new("face_system.internal", text.parse::<Table>().unwrap())
}

fn configure(
    factory: &mut InternalFactory,
    section: Option<&ConfigSection>,
) -> Result<(), ConfigError> {
    factory.process_config(section, &mut ConfigContext::new(true))?;
    factory.process_config(section, &mut ConfigContext::new(false))
}

fn request(uri: &str, persistency: FacePersistency) -> CreateFaceRequest {
    CreateFaceRequest {
        uri: FaceUri::parse(uri).unwrap(),
        persistency,
        want_local_fields_enabled: true,
    }
}

fn create(
    factory: &mut InternalFactory,
    request: CreateFaceRequest,
) -> Result<Face, CreationError> {
    let outcome = Outcome::default();
    let created = Arc::clone(&outcome);
    let failed = Arc::clone(&outcome);
    factory.create_face(
        request,
        CreateFaceCompletion::new(
            Box::new(move |face: Face| *created.lock() = Some(Ok(face))),
            Box::new(move |err: CreationError| *failed.lock() = Some(Err(err))),
        ),
    );
    let result = outcome.lock().take();
    result.expect("completion delivered synchronously")
}

fn create_persistent(factory: &mut InternalFactory) -> Result<Face, CreationError> {
    create(factory, request("internal://", FacePersistency::Persistent))
}

fn enabled_factory() -> InternalFactory {
    let mut factory = InternalFactory::new();
    configure(&mut factory, None).unwrap();
    factory
}

#[test]
fn test_defaults_when_section_absent() {
    let factory = enabled_factory();
    assert_eq!(factory.options(), &InternalOptions::default());
    assert_eq!(
        factory.provided_schemes().iter().collect::<Vec<_>>(),
        ["internal"]
    );
    let channels = factory.get_channels();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].uri().to_string(), "internal://");
    assert!(channels[0].is_listening());
}

#[test]
fn test_dry_run_has_no_side_effects() {
    let mut factory = InternalFactory::new();
    factory
        .process_config(Some(&section("max_faces = 2\n")), &mut ConfigContext::new(true))
        .unwrap();

    assert!(factory.provided_schemes().is_empty());
    assert!(factory.get_channels().is_empty());
    assert_eq!(factory.options().max_faces, 256);
}

#[test]
fn test_invalid_options_rejected_in_both_passes() {
    for text in ["max_faces = 0\n", "enabled = \"yes\"\n", "bogus = 1\n", "max_faces = -3\n"] {
        let config = section(text);
        for is_dry_run in [true, false] {
            let mut factory = InternalFactory::new();
            let err = factory
                .process_config(Some(&config), &mut ConfigContext::new(is_dry_run))
                .unwrap_err();
            assert!(
                matches!(
                    err,
                    ConfigError::InvalidValue { ref path, .. }
                        if path.starts_with("face_system.internal")
                ),
                "{text}: {err}"
            );
            assert!(factory.provided_schemes().is_empty());
        }
    }
}

#[test]
fn test_disable_drops_channel_and_schemes() {
    let mut factory = enabled_factory();
    let slot = factory.channel_slot();
    assert!(slot.get().is_some());

    configure(&mut factory, Some(&section("enabled = false\n"))).unwrap();

    assert!(factory.provided_schemes().is_empty());
    assert!(factory.get_channels().is_empty());
    assert!(slot.get().is_none());
}

#[test]
fn test_channel_reused_across_reloads() {
    let mut factory = enabled_factory();
    let before = factory.channel_slot().get().unwrap();
    configure(&mut factory, Some(&section("max_faces = 10\n"))).unwrap();
    let after = factory.channel_slot().get().unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(factory.options().max_faces, 10);
}

#[test]
fn test_create_local_face() {
    let mut factory = enabled_factory();
    let face = create(&mut factory, request("internal://", FacePersistency::Persistent)).unwrap();

    assert!(face.is_local());
    assert!(face.local_fields_enabled());
    assert_eq!(face.remote_uri().scheme(), "internal");
    assert_eq!(face.local_uri().to_string(), "internal://");
    assert_eq!(factory.get_channels()[0].size(), 1);

    let other = create(&mut factory, request("internal://", FacePersistency::Permanent)).unwrap();
    assert_ne!(face.remote_uri(), other.remote_uri());
    assert_eq!(factory.get_channels()[0].size(), 2);
}

#[test]
fn test_create_failures() {
    let mut disabled = InternalFactory::new();
    assert_eq!(
        create(&mut disabled, request("internal://", FacePersistency::Persistent))
            .unwrap_err()
            .status,
        504
    );

    let mut factory = enabled_factory();
    assert_eq!(
        create(&mut factory, request("internal://", FacePersistency::OnDemand))
            .unwrap_err()
            .status,
        406
    );
    assert_eq!(
        create(&mut factory, request("udp4://192.0.2.1:6363", FacePersistency::Persistent))
            .unwrap_err()
            .status,
        400
    );
}

#[test]
fn test_face_limit() {
    let mut factory = InternalFactory::new();
    configure(&mut factory, Some(&section("max_faces = 1\n"))).unwrap();

    let mut first = create_persistent(&mut factory).unwrap();
    let err = create_persistent(&mut factory).unwrap_err();
    assert_eq!(err.status, 403);

    // closing the first face frees its slot
    first.close();
    assert!(create_persistent(&mut factory).is_ok());
}

#[test]
fn test_client_exchanges_packets_with_face() {
    let mut factory = enabled_factory();
    let mut face = create_persistent(&mut factory).unwrap();
    let channel = factory.channel_slot().get().unwrap();
    let client = channel.client(face.remote_uri()).unwrap();

    let received = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&received);
    face.on_receive_interest()
        .connect(move |i: &Interest| log.lock().push(i.name().to_string()));

    let interest = Interest::new("/app/hello".parse().unwrap());
    client.send(&Packet::Interest(interest)).unwrap();
    assert_eq!(face.process_incoming(), 1);
    assert_eq!(*received.lock(), ["/app/hello"]);

    face.send_data(Data::new("/app/hello".parse().unwrap(), b"world"));
    let reply = client.receive().unwrap();
    match TlvPacketDecoder.decode(&reply).unwrap() {
        Packet::Data(data) => assert_eq!(data.name().to_string(), "/app/hello"),
        other => panic!("expected Data, got {other:?}"),
    }
    assert!(client.receive().is_none());
}

#[test]
fn test_client_close_fails_face() {
    let mut factory = enabled_factory();
    let mut face = create_persistent(&mut factory).unwrap();
    let client = factory
        .channel_slot()
        .get()
        .and_then(|channel| channel.client(face.remote_uri()))
        .unwrap();

    let reasons = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&reasons);
    face.on_fail().connect(move |r: &String| log.lock().push(r.clone()));

    client.close();
    face.process_incoming();

    assert_eq!(*reasons.lock(), ["transport went down"]);
    assert!(face.is_closed());
}

#[test]
fn test_face_close_disconnects_client() {
    let mut factory = enabled_factory();
    let mut face = create_persistent(&mut factory).unwrap();
    let channel = factory.channel_slot().get().unwrap();
    let client = channel.client(face.remote_uri()).unwrap();

    face.close();

    assert!(client.is_closed());
    assert!(client.send(&Packet::Interest(Interest::new("/x".parse().unwrap()))).is_err());
    assert!(channel.client(face.remote_uri()).is_none());
}
