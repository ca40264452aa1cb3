use serde_json::{Value, json};
use web3ws::codec::CodecError;
use web3ws_rpc_service::{RpcMethod, rpc_method};

rpc_method!(NetVersion, "net_version", (), String);
rpc_method!(EthBlockByNumber, "eth_getBlockByNumber", Vec<Value>, Option<Value>);

#[test]
fn make_request_stamps_name_and_id() {
    let request = NetVersion::make_request(12);
    assert_eq!(request.id, 12);
    assert_eq!(request.method, "net_version");
}

#[test]
fn unit_params_round_trip_through_descriptor() {
    let request = NetVersion::make_request(1);
    let bytes = NetVersion::encode_request(&request).unwrap();

    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["params"], json!([]));
    assert_eq!(NetVersion::decode_request(&bytes).unwrap(), request);
}

#[test]
fn positional_params_round_trip_through_descriptor() {
    let mut request = EthBlockByNumber::make_request(2);
    request.params = vec![json!("0x1b4"), json!(true)];

    let bytes = EthBlockByNumber::encode_request(&request).unwrap();
    assert_eq!(EthBlockByNumber::decode_request(&bytes).unwrap(), request);
}

#[test]
fn decode_request_rejects_other_methods() {
    let bytes = NetVersion::encode_request(&NetVersion::make_request(3)).unwrap();
    assert!(matches!(
        EthBlockByNumber::decode_request(&bytes),
        Err(CodecError::InvalidParams(_))
    ));
}

#[test]
fn results_decode_from_json_primitives() {
    assert_eq!(NetVersion::decode_result(json!("1")).unwrap(), "1");
    assert_eq!(EthBlockByNumber::decode_result(Value::Null).unwrap(), None);
    assert!(NetVersion::decode_result(json!(1)).is_err());
}
