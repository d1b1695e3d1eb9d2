use apng_edit::{
  png::{ApngChunk, Chunk, RawChunkIter},
  Apng,
};

fn main() {
  let args: Vec<String> = std::env::args().collect();
  println!("ARGS: {args:?}");
  for file_arg in args[1..].iter() {
    let path = std::path::Path::new(file_arg);
    print!("Reading `{}`... ", path.display());
    let bytes = match std::fs::read(path) {
      Ok(bytes) => {
        println!("got {} bytes.", bytes.len());
        bytes
      }
      Err(e) => {
        println!("{e:?}");
        continue;
      }
    };
    for (n, raw_chunk) in RawChunkIter::new(&bytes).enumerate() {
      let chunk_res = raw_chunk.and_then(|raw| ApngChunk::try_from(Chunk::from(raw)));
      println!("{n}: {chunk_res:?}");
    }
    match Apng::from_bytes(&bytes) {
      Ok(apng) => {
        let (width, height) = apng.canvas_size();
        println!(
          "{width}x{height}, {} frames, plays: {:?}, loop: {:?}",
          apng.frames().len(),
          apng.play_count(),
          apng.loop_duration()
        );
        for (i, frame) in apng.frames().iter().enumerate() {
          println!("frame {i}: {:?} for {:?}", frame.control(), frame.delay());
        }
      }
      Err(e) => println!("not a usable APNG: {e}"),
    }
  }
}
