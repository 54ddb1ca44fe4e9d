//! Build script for warden-sync
//!
//! Generates the gRPC client stubs for the business-logic backend.
//!
//! ## Generated Code
//! The message types are written by hand in `src/proto.rs` with prost
//! derives, so this script only needs the service definitions. It uses
//! tonic-build's manual builder, which does not require `protoc`.
//!
//! One file per service lands in `$OUT_DIR`, named `<package>.<Service>.rs`:
//! - `DnsService` - profile sync, device creation, billing, settings
//! - `SessionTicketService` - TLS session tickets
//! - `CustomDomainService` - custom-domain certificates
//! - `RemoteKvService` - remote key/value storage

use tonic_build::manual::{Builder, Method, Service};

const PACKAGE: &str = "warden.backend.v1";
const CODEC: &str = "tonic::codec::ProstCodec";

fn method(name: &str, route: &str, input: &str, output: &str) -> tonic_build::manual::MethodBuilder {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::proto::{input}"))
        .output_type(format!("crate::proto::{output}"))
        .codec_path(CODEC)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let dns = Service::builder()
        .name("DnsService")
        .package(PACKAGE)
        .method(
            method("get_dns_profiles", "GetDNSProfiles", "DnsProfilesRequest", "DnsProfile")
                .server_streaming()
                .build(),
        )
        .method(
            method(
                "create_device_by_human_id",
                "CreateDeviceByHumanId",
                "CreateDeviceRequest",
                "CreateDeviceResponse",
            )
            .build(),
        )
        .method(
            method(
                "save_devices_billing_stat",
                "SaveDevicesBillingStat",
                "DeviceBillingStat",
                "SaveDevicesBillingStatResponse",
            )
            .client_streaming()
            .build(),
        )
        .method(
            method(
                "get_rate_limit_settings",
                "GetRateLimitSettings",
                "RateLimitSettingsRequest",
                "RateLimitSettingsResponse",
            )
            .build(),
        )
        .method(
            method(
                "get_global_access_settings",
                "GetGlobalAccessSettings",
                "GlobalAccessSettingsRequest",
                "GlobalAccessSettingsResponse",
            )
            .build(),
        )
        .build();

    let tickets = Service::builder()
        .name("SessionTicketService")
        .package(PACKAGE)
        .method(
            method(
                "get_session_tickets",
                "GetSessionTickets",
                "SessionTicketRequest",
                "SessionTicketResponse",
            )
            .build(),
        )
        .build();

    let custom_domains = Service::builder()
        .name("CustomDomainService")
        .package(PACKAGE)
        .method(
            method(
                "get_custom_domain_certificate",
                "GetCustomDomainCertificate",
                "CustomDomainCertificateRequest",
                "CustomDomainCertificateResponse",
            )
            .build(),
        )
        .build();

    let remote_kv = Service::builder()
        .name("RemoteKvService")
        .package(PACKAGE)
        .method(method("get", "Get", "RemoteKvGetRequest", "RemoteKvGetResponse").build())
        .method(method("set", "Set", "RemoteKvSetRequest", "RemoteKvSetResponse").build())
        .build();

    // Clients only; the backend lives elsewhere.
    Builder::new()
        .build_server(false)
        .build_client(true)
        .compile(&[dns, tickets, custom_domains, remote_kv]);
}
