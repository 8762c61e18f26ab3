use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha384};

use recstream_types::{FileDigest, DIGEST_LEN};

/// SHA-384 digest of a byte slice.
///
/// This is the external contract with the record-file writer: file *N*
/// embeds exactly this digest of file *N−1*'s raw bytes, so any other
/// primitive (or any logical reconstruction of the content) would make
/// every chain link appear broken.
pub fn digest384(bytes: &[u8]) -> FileDigest {
    let mut hasher = Sha384::new();
    hasher.update(bytes);
    finalize(hasher)
}

/// SHA-384 digest of everything remaining in a reader, streamed.
pub fn digest384_reader<R: Read>(mut reader: R) -> io::Result<FileDigest> {
    let mut hasher = Sha384::new();
    let mut buf = [0u8; 8192];
    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(finalize(hasher))
}

/// SHA-384 digest of a file's exact on-disk bytes.
pub fn digest384_file(path: &Path) -> io::Result<FileDigest> {
    digest384_reader(BufReader::new(File::open(path)?))
}

fn finalize(hasher: Sha384) -> FileDigest {
    let output = hasher.finalize();
    let mut hash = [0u8; DIGEST_LEN];
    hash.copy_from_slice(&output);
    FileDigest::from_hash(hash)
}
