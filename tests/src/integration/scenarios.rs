//! # Dispatch Scenarios
//!
//! Envelope bytes in, `DispatchResult` or `RouterError` out, through the
//! real codec and a router built the way a node bootstraps one.

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        bytes_field, envelope, ping_envelope, ping_router, Ping, Pong, Unknown, PANIC_NONCE,
    };
    use dvs_01_envelope_codec::{CodecError, EncodingViolation};
    use dvs_02_msg_router::{HandlerError, RouterError};
    use prost::Message;
    use shared_types::errors::sdk;
    use shared_types::{BaseContext, DomainMessage, EventLog, RequestContext, ValidatedResponse};

    // =========================================================================
    // SCENARIO A: registered request handler
    // =========================================================================

    #[tokio::test]
    async fn test_registered_ping_answers_pong() {
        let (router, server) = ping_router(false);

        let result = router
            .dispatch(RequestContext::background(), &ping_envelope(1))
            .await
            .unwrap();

        let expected = Pong {
            pong: true,
            nonce: 1,
            phase: "request".into(),
            server: "primary".into(),
        };
        assert_eq!(result.raw_bytes, expected.encode_to_vec());
        assert_eq!(
            result.packed_response.as_ref().unwrap().unpack::<Pong>().unwrap(),
            expected
        );
        assert!(result.custom_data.is_none());
        assert!(result.custom_digest.is_none());
        assert!(result.log.is_empty());
        assert_eq!(server.request_calls(), 1);
    }

    // =========================================================================
    // SCENARIO B: unregistered type
    // =========================================================================

    #[tokio::test]
    async fn test_unregistered_type_is_not_found() {
        let (router, server) = ping_router(false);

        let err = router
            .dispatch(
                RequestContext::background(),
                &envelope(&[Unknown { n: 1 }.to_any()]),
            )
            .await
            .unwrap_err();

        assert!(err.is_handler_not_found());
        assert_eq!(err.to_string(), "no handler found for svc.Unknown");
        assert_eq!(err.registered(), Some(sdk::UNKNOWN_REQUEST));
        assert_eq!(server.request_calls(), 0);
    }

    #[tokio::test]
    async fn test_first_routable_message_wins() {
        let (router, _) = ping_router(false);
        let raw = envelope(&[Unknown { n: 9 }.to_any(), Ping { nonce: 3 }.to_any()]);

        let result = router
            .dispatch(RequestContext::background(), &raw)
            .await
            .unwrap();
        let pong = Pong::decode(result.raw_bytes.as_slice()).unwrap();
        assert_eq!(pong.nonce, 3);
    }

    // =========================================================================
    // SCENARIO C: non-canonical field order
    // =========================================================================

    #[tokio::test]
    async fn test_descending_tags_rejected_before_unmarshal() {
        let (router, server) = ping_router(false);

        // The body is not a valid Body either; an unmarshal attempt would
        // fail differently.
        let mut raw = Vec::new();
        bytes_field(2, b"auth", &mut raw);
        bytes_field(1, &[0xff, 0xff, 0xff], &mut raw);
        bytes_field(3, b"sig", &mut raw);

        let err = router
            .dispatch(RequestContext::background(), &raw)
            .await
            .unwrap_err();

        assert!(err.is_invalid_encoding());
        assert!(matches!(
            err,
            RouterError::Codec(CodecError::InvalidEncoding(EncodingViolation::FieldOrder {
                field: 1,
                previous: 2
            }))
        ));
        assert_eq!(err.registered(), Some(sdk::TX_DECODE));
        assert_eq!(server.request_calls(), 0);
    }

    // =========================================================================
    // SCENARIO D: request phase, then response phase
    // =========================================================================

    #[tokio::test]
    async fn test_validated_response_switches_to_response_handler() {
        let (router, server) = ping_router(false);
        let raw = ping_envelope(7);

        let request_ctx = RequestContext::background();
        assert_eq!(router.key_for(&request_ctx, Ping::TYPE_ID), "svc.Ping");
        let first = router.dispatch(request_ctx, &raw).await.unwrap();

        let response_ctx = RequestContext::background()
            .with_validated_response(Some(ValidatedResponse::new(vec![], vec![0xab])));
        assert_eq!(
            router.key_for(&response_ctx, Ping::TYPE_ID),
            "svc.Ping#response"
        );
        let second = router.dispatch(response_ctx, &raw).await.unwrap();

        assert_eq!(Pong::decode(first.raw_bytes.as_slice()).unwrap().phase, "request");
        assert_eq!(Pong::decode(second.raw_bytes.as_slice()).unwrap().phase, "response");
        assert_eq!(server.request_calls(), 1);
        assert_eq!(server.response_calls(), 1);
        assert_eq!(
            second.event_triples(),
            vec![("pong".into(), "validated".into(), "ab".into())]
        );
    }

    #[tokio::test]
    async fn test_response_phase_without_response_handler_is_not_found() {
        let (router, _) = ping_router(false);
        let ctx = RequestContext::background()
            .with_validated_response(Some(ValidatedResponse::default()));

        let err = router
            .dispatch(ctx, &envelope(&[Unknown { n: 1 }.to_any()]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no handler found for svc.Unknown#response");
    }

    // =========================================================================
    // BOUNDARY FAILURES
    // =========================================================================

    #[tokio::test]
    async fn test_handler_panic_becomes_error() {
        let (router, _) = ping_router(false);

        let err = router
            .dispatch(RequestContext::background(), &ping_envelope(PANIC_NONCE))
            .await
            .unwrap_err();

        match &err {
            RouterError::Handler(HandlerError::Panicked { method, message }) => {
                assert_eq!(*method, "Ping");
                assert!(message.contains("cursed"), "{message}");
            }
            other => panic!("expected a panic error, got {other:?}"),
        }
        assert_eq!(err.registered(), Some(sdk::PANIC));

        // The router keeps serving after a panic.
        assert!(router
            .dispatch(RequestContext::background(), &ping_envelope(1))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_empty_envelope_is_invalid_encoding() {
        let (router, _) = ping_router(false);

        let err = router
            .dispatch(RequestContext::background(), &envelope(&[]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RouterError::Codec(CodecError::InvalidEncoding(EncodingViolation::NoMessages))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_context_is_not_dispatched() {
        let (router, server) = ping_router(false);
        let (base, handle) = BaseContext::background().with_cancel();
        handle.cancel();

        let err = router
            .dispatch(RequestContext::new(base, EventLog::new()), &ping_envelope(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::Cancelled));
        assert_eq!(server.request_calls(), 0);
    }
}
