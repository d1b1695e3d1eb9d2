use apng_edit::{png::*, Apng, FormatError};

#[test]
fn test_RawChunkIter_no_panics() {
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    for _ in RawChunkIter::new(&v) {
      //
    }
  }
}

#[test]
fn test_Apng_from_bytes_no_panics() {
  for _ in 0..10 {
    let _ = Apng::from_bytes(&super::rand_bytes(1024));
    // get past the signature check too
    let mut v = PNG_SIGNATURE.to_vec();
    v.extend(super::rand_bytes(1024));
    let _ = Apng::from_bytes(&v);
  }
}

#[test]
fn test_every_truncation_is_handled() {
  let bytes = super::three_frame_apng(1);
  for cut in 0..bytes.len() {
    let _ = Apng::from_bytes(&bytes[..cut]);
  }
  assert!(matches!(
    Apng::from_bytes(&bytes[..bytes.len() - 1]),
    Err(FormatError::Truncated { .. })
  ));
  assert_eq!(Apng::from_bytes(&bytes[..5]), Err(FormatError::BadSignature));
  assert_eq!(Apng::from_bytes(&PNG_SIGNATURE), Err(FormatError::NoChunksPresent));
}

#[test]
fn test_fixture_chunk_layout() {
  let bytes = super::three_frame_apng(1);
  let types = super::chunk_types(&bytes);
  assert_eq!(
    types,
    vec![
      ChunkType::IHDR,
      ChunkType::acTL,
      ChunkType::fcTL,
      ChunkType::IDAT,
      ChunkType::fcTL,
      ChunkType::fdAT,
      ChunkType::fcTL,
      ChunkType::fdAT,
      ChunkType::IEND,
    ]
  );
  for raw in RawChunkIter::new(&bytes) {
    let raw = raw.unwrap();
    assert_eq!(raw.declared_crc(), raw.compute_actual_crc());
  }
}
