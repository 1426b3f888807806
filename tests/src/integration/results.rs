//! # Result Pipeline
//!
//! What a successful dispatch hands back: the encoded output, the events of
//! the call, and the extractor fields when one is registered.

#[cfg(test)]
mod tests {
    use crate::fixtures::{ping_envelope, ping_router, Pong, PongDigest, REFUSED_NONCE};
    use dvs_02_msg_router::{ExtractorError, ResultExtractor, RouterBuilder, RouterConfig};
    use prost::Message;
    use sha2::{Digest, Sha256};
    use shared_types::errors::sdk;
    use shared_types::{BaseContext, Event, EventLog, RequestContext};
    use std::sync::Arc;

    // =========================================================================
    // FIDELITY
    // =========================================================================

    #[tokio::test]
    async fn test_raw_bytes_and_events_match_call() {
        let (router, _) = ping_router(false);
        let log = EventLog::new();
        log.emit(Event::new("ante").with_attribute("fee", "0"));
        let ctx = RequestContext::new(BaseContext::background(), log.clone()).with_height(88);

        let result = router.dispatch(ctx, &ping_envelope(4)).await.unwrap();

        let packed = result.packed_response.clone().unwrap();
        assert_eq!(packed.type_id(), "svc.Pong");
        assert_eq!(result.raw_bytes, packed.value);
        assert_eq!(result.raw_bytes, packed.unpack::<Pong>().unwrap().encode_to_vec());

        // Events the caller recorded before dispatch come first.
        assert_eq!(result.events, log.events());
        assert_eq!(
            result.event_triples(),
            vec![
                ("ante".into(), "fee".into(), "0".into()),
                ("ping".into(), "nonce".into(), "4".into()),
                ("ping".into(), "height".into(), "88".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_handler_error_yields_no_result() {
        let (router, _) = ping_router(true);

        let err = router
            .dispatch(RequestContext::background(), &ping_envelope(REFUSED_NONCE))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "nonce refused: invalid request");
        assert_eq!(err.registered(), Some(sdk::INVALID_REQUEST));
    }

    // =========================================================================
    // EXTRACTOR OPT-IN
    // =========================================================================

    #[tokio::test]
    async fn test_extractor_populates_custom_fields() {
        let (plain, _) = ping_router(false);
        let (extracting, _) = ping_router(true);
        let raw = ping_envelope(11);

        let without = plain
            .dispatch(RequestContext::background(), &raw)
            .await
            .unwrap();
        assert!(without.custom_data.is_none());
        assert!(without.custom_digest.is_none());

        let with = extracting
            .dispatch(RequestContext::background(), &raw)
            .await
            .unwrap();
        assert_eq!(with.custom_data.as_deref(), Some(with.raw_bytes.as_slice()));
        assert_eq!(
            with.custom_digest.unwrap(),
            Sha256::digest(&with.raw_bytes).to_vec()
        );
    }

    struct BrokenDigest;

    impl ResultExtractor<Pong> for BrokenDigest {
        fn get_data(&self, msg: &Pong) -> Result<Vec<u8>, ExtractorError> {
            PongDigest.get_data(msg)
        }

        fn get_digest(&self, _msg: &Pong) -> Result<Vec<u8>, ExtractorError> {
            Err(ExtractorError::Failed("no digest for pongs".into()))
        }
    }

    #[tokio::test]
    async fn test_extractor_failure_leaves_field_empty() {
        let mut builder = RouterBuilder::new(RouterConfig::default());
        builder
            .register_service(
                &crate::fixtures::ping_service(),
                Arc::new(crate::fixtures::PingServer::default()),
            )
            .unwrap();
        builder.register_extractor::<Pong, _>(BrokenDigest);
        let router = builder.build();

        let result = router
            .dispatch(RequestContext::background(), &ping_envelope(2))
            .await
            .unwrap();
        assert!(result.custom_data.is_some());
        assert!(result.custom_digest.is_none());
        assert!(result.packed_response.is_some());
    }
}
