//! # Node Flows
//!
//! A full validation round through `DvsNode`: the request phase produces
//! data and a digest, the validated outcome comes back and is routed to the
//! response handler.

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        envelope, ping_envelope, ping_router, PingServer, Pong, Unknown, PANIC_NONCE,
    };
    use dvs_node::{
        DvsNode, DvsRequest, NodeConfig, RequestProcessDvsRequest, RequestProcessDvsResponse,
    };
    use prost::Message;
    use sha2::{Digest, Sha256};
    use shared_types::errors::sdk;
    use shared_types::{BaseContext, DomainMessage, KvStore, Operator, ValidatedResponse};
    use std::sync::Arc;

    fn node(config: NodeConfig) -> DvsNode {
        node_with_server(config).0
    }

    fn node_with_server(config: NodeConfig) -> (DvsNode, Arc<PingServer>) {
        let (router, server) = ping_router(true);
        (DvsNode::new(config, router).unwrap(), server)
    }

    fn dvs_request(data: Vec<u8>) -> DvsRequest {
        DvsRequest {
            data,
            height: 12,
            chain_id: 17000,
            group_numbers: vec![0],
            group_threshold_percentages: vec![67],
        }
    }

    #[tokio::test]
    async fn test_full_round() {
        let (node, server) = node_with_server(NodeConfig::default());
        let request = dvs_request(ping_envelope(21));

        let first = node
            .process_dvs_request(
                BaseContext::background(),
                RequestProcessDvsRequest {
                    request: request.clone(),
                    operators: vec![Operator {
                        address: "op-1".into(),
                        stake: 100,
                        ..Operator::default()
                    }],
                },
            )
            .await
            .unwrap();
        assert_eq!(first.code, 0);
        assert!(first.codespace.is_empty());
        let pong = Pong::decode(first.response.as_slice()).unwrap();
        assert_eq!((pong.nonce, pong.phase.as_str()), (21, "request"));
        assert_eq!(first.response_digest, Sha256::digest(&first.response).to_vec());
        assert!(first.events.iter().flat_map(|e| &e.attributes).all(|a| a.index));

        let second = node
            .process_dvs_response(
                BaseContext::background(),
                RequestProcessDvsResponse {
                    dvs_request: request,
                    dvs_response: ValidatedResponse::new(
                        first.response,
                        first.response_digest.clone(),
                    ),
                },
            )
            .await
            .unwrap();
        assert_eq!(second.code, 0);
        let pong = Pong::decode(second.data.as_slice()).unwrap();
        assert_eq!(pong.phase, "response");
        assert_eq!(second.events[0].kind, "pong");
        assert_eq!(
            server.store().get(&PingServer::round_key(21)).unwrap(),
            Some(first.response_digest)
        );
    }

    #[tokio::test]
    async fn test_error_codes_at_boundary() {
        let node = node(NodeConfig::default());

        let cases = [
            (envelope(&[Unknown { n: 1 }.to_any()]), sdk::UNKNOWN_REQUEST),
            (vec![0x1a, 0x00, 0x0a, 0x00], sdk::TX_DECODE),
            (ping_envelope(PANIC_NONCE), sdk::PANIC),
        ];

        for (data, expected) in cases {
            let err = node
                .process_dvs_request(
                    BaseContext::background(),
                    RequestProcessDvsRequest {
                        request: dvs_request(data),
                        operators: vec![],
                    },
                )
                .await
                .unwrap_err();
            assert_eq!(err.response.codespace, expected.codespace());
            assert_eq!(err.response.code, expected.code());
            assert!(err.response.response.is_empty());
        }
    }

    #[tokio::test]
    async fn test_trace_reports_error_detail() {
        let config = NodeConfig {
            trace: true,
            ..NodeConfig::default()
        };
        let node = node(config);

        let err = node
            .process_dvs_request(
                BaseContext::background(),
                RequestProcessDvsRequest {
                    request: dvs_request(envelope(&[Unknown { n: 1 }.to_any()])),
                    operators: vec![],
                },
            )
            .await
            .unwrap_err();
        assert!(err.response.log.contains("HandlerNotFound"), "{}", err.response.log);
        assert!(err.response.log.contains(Unknown::TYPE_ID));
    }

    #[tokio::test]
    async fn test_selected_events_indexed() {
        let config = NodeConfig {
            index_events: vec!["ping.height".into()],
            ..NodeConfig::default()
        };
        let node = node(config);

        let resp = node
            .process_dvs_request(
                BaseContext::background(),
                RequestProcessDvsRequest {
                    request: dvs_request(ping_envelope(1)),
                    operators: vec![],
                },
            )
            .await
            .unwrap();
        let marks: Vec<_> = resp.events[0]
            .attributes
            .iter()
            .map(|a| (a.key.as_str(), a.index))
            .collect();
        assert_eq!(marks, vec![("nonce", false), ("height", true)]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = NodeConfig {
            name: String::new(),
            ..NodeConfig::default()
        };
        let (router, _) = ping_router(false);
        assert!(DvsNode::new(config, router).is_err());
    }
}
