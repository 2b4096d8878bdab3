/// HTTP gateways to the upstream platform services.
pub mod gateway;
