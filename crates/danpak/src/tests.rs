#![cfg(test)]
#![cfg(all(feature = "archive", feature = "builder"))]
// This is meant to mirror as closely as possible, how users should use the crate

use std::{
	collections::BTreeMap,
	fs,
	io::Cursor,
	path::Path,
};

use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::prelude::*;
use crate::format::ArchiveHeader;
use crate::global::codec::Codec;
use crate::crypto_utils::{gen_block, hash_password};

// Seeded filler, good enough to defeat deflate
fn noise(len: usize, seed: u64) -> Vec<u8> {
	let mut data = vec![0u8; len];
	StdRng::seed_from_u64(seed).fill_bytes(&mut data);
	data
}

fn write_tree(root: &Path, files: &[(&str, Vec<u8>)]) {
	for (path, data) in files {
		let path = root.join(path);
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, data).unwrap();
	}
}

// relative `/` path -> contents, for every file below `root`
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
	walkdir::WalkDir::new(root)
		.into_iter()
		.map(|e| e.unwrap())
		.filter(|e| e.file_type().is_file())
		.map(|e| {
			let relative = e.path().strip_prefix(root).unwrap();
			let id = relative
				.components()
				.map(|c| c.as_os_str().to_string_lossy().into_owned())
				.collect::<Vec<_>>()
				.join("/");

			(id, fs::read(e.path()).unwrap())
		})
		.collect()
}

fn codecs() -> Vec<(EncryptionAlgorithm, CompressionAlgorithm)> {
	#[allow(unused_mut)]
	let mut codecs = vec![(EncryptionAlgorithm::None, CompressionAlgorithm::None)];

	#[cfg(feature = "crypto")]
	codecs.push((EncryptionAlgorithm::Aes256, CompressionAlgorithm::None));
	#[cfg(feature = "compression")]
	codecs.push((EncryptionAlgorithm::None, CompressionAlgorithm::Zip));
	#[cfg(all(feature = "crypto", feature = "compression"))]
	codecs.push((EncryptionAlgorithm::Aes256, CompressionAlgorithm::Zip));

	codecs
}

fn plain() -> PackConfig {
	PackConfig::default()
		.encryption(EncryptionAlgorithm::None)
		.compression(CompressionAlgorithm::None)
}

fn dump_to_vec(files: &[(&str, &[u8])], config: &PackConfig) -> Vec<u8> {
	let mut leaves: Vec<_> = files.iter().map(|(id, data)| Leaf::new(*data, id)).collect();
	let mut target = Cursor::new(Vec::new());

	let written = dump(&mut target, &mut leaves, config, None).unwrap();
	assert_eq!(written, target.get_ref().len() as u64);

	target.into_inner()
}

fn open(bytes: Vec<u8>, password: &str) -> InternalResult<FileArchive<Cursor<Vec<u8>>>> {
	let mut archive = FileArchive::new();
	archive.open(Cursor::new(bytes), password)?;
	Ok(archive)
}

// A minVersion 0 archive: plain tree straight after the header, plain entries after the tree
fn legacy_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
	let placeholder = {
		let mut tree = DirTree::new();
		for (idx, (id, _)) in files.iter().enumerate() {
			tree.insert(id, idx as u64).unwrap();
		}
		tree.to_json().unwrap()
	};

	let header_size = ArchiveHeader::BASE_SIZE as u64;
	let mut offset = header_size + placeholder.len() as u64;

	let mut tree = DirTree::new();
	let mut body = Vec::new();

	for (id, data) in files {
		tree.insert(id, offset).unwrap();

		let entry = FileHeader {
			uncompressed_size: data.len() as u64,
			compressed_size: data.len() as u64,
			crc: 0,
			block: [0; 16],
		};

		body.extend_from_slice(&entry.to_bytes());
		body.extend_from_slice(data);
		offset += EntryHeader::BASE_SIZE as u64 + data.len() as u64;
	}

	let json = tree.to_json().unwrap();
	assert_eq!(json.len(), placeholder.len());

	let header = ArchiveHeader {
		dir_header_size: json.len() as u64,
		version: 0,
		min_version: 0,
		encryption: EncryptionAlgorithm::None,
		compression: CompressionAlgorithm::None,
		level: 0,
		dir_header_loc: 0,
		..ArchiveHeader::default()
	};

	let mut bytes = header.to_bytes().to_vec();
	bytes.extend_from_slice(json.as_bytes());
	bytes.extend_from_slice(&body);
	bytes
}

#[test]
fn folder_roundtrip_every_codec() -> InternalResult {
	let source = tempfile::tempdir()?;
	write_tree(
		source.path(),
		&[
			("readme.txt", b"Hello, Cassandra!".to_vec()),
			("empty.bin", Vec::new()),
			("sfx/footstep.raw", noise(5000, 1)),
			("sfx/ambient/wind.ogg", noise(70_000, 2)),
			("scripts/boss.lua", b"fire(ring, 36) ".repeat(400)),
		],
	);

	let expected = snapshot(source.path());

	for (encryption, compression) in codecs() {
		for password in ["", "secret", "a password longer than thirty-two bytes, easily"] {
			let scratch = tempfile::tempdir()?;
			let archive_path = scratch.path().join("assets.pak");
			let out = scratch.path().join("out");

			let config = PackConfig::default()
				.password(password)
				.encryption(encryption)
				.compression(compression);

			pack(&archive_path, source.path(), &config)?;
			unpack(&archive_path, &out, password)?;

			assert_eq!(snapshot(&out), expected, "{} / {} / {:?}", encryption, compression, password);
		}
	}

	Ok(())
}

#[test]
#[cfg(all(feature = "crypto", feature = "compression"))]
fn two_asset_scenario() -> InternalResult {
	let png = noise(37 * 1024, 37);
	let mut cfg = b"{\"title\":\"Touhou-like\",\"resolution\":[640,480],\"fullscreen\":false}".to_vec();
	cfg.resize(120, b' ');

	let source = tempfile::tempdir()?;
	write_tree(source.path(), &[("img/a.png", png.clone()), ("data/cfg.json", cfg.clone())]);

	let scratch = tempfile::tempdir()?;
	let archive_path = scratch.path().join("game.pak");
	let out = scratch.path().join("unpacked");

	let config = PackConfig::default()
		.password("secret")
		.encryption(EncryptionAlgorithm::Aes256)
		.compression(CompressionAlgorithm::Zip)
		.level(9);

	pack(&archive_path, source.path(), &config)?;
	unpack(&archive_path, &out, "secret")?;

	let unpacked_png = fs::read(out.join("img/a.png"))?;
	let unpacked_cfg = fs::read(out.join("data/cfg.json"))?;
	assert_eq!(unpacked_png.len(), 37 * 1024);
	assert_eq!(unpacked_png, png);
	assert_eq!(unpacked_cfg.len(), 120);
	assert_eq!(unpacked_cfg, cfg);

	let archive = FileArchive::from_path(&archive_path, "secret")?;
	let paths: Vec<String> = archive.file_tree("")?.paths().into_iter().map(|(p, _)| p).collect();
	assert_eq!(paths, vec!["data/cfg.json".to_string(), "img/a.png".to_string()]);

	let header = archive.header()?;
	assert_eq!(header.version, crate::VERSION);
	assert_eq!(header.min_version, 1);
	assert_eq!(header.encryption, EncryptionAlgorithm::Aes256);
	assert_eq!(header.compression, CompressionAlgorithm::Zip);
	assert_eq!(header.level, 9);
	assert_ne!(header.dir_header_loc, 0);

	Ok(())
}

#[test]
fn random_access() -> InternalResult {
	for (encryption, compression) in codecs() {
		let config = PackConfig::default()
			.password("pw")
			.encryption(encryption)
			.compression(compression);

		let bytes = dump_to_vec(
			&[
				("a/b.txt", b"bee"),
				("a/c/d.txt", b"dee"),
				("shaders/bullet.wgsl", b"@vertex fn main() {}"),
			],
			&config,
		);

		let mut archive = open(bytes, "pw")?;
		assert!(archive.is_open());

		let offset = archive.locate("a/b.txt")?;
		assert_eq!(archive.locate("A/B.TXT")?, offset);
		assert_eq!(archive.locate("a/../a/b.txt")?, offset);
		assert_eq!(archive.locate("a\\b.txt")?, offset);

		assert_eq!(archive.text_file("a/b.txt")?, "bee");
		assert_eq!(archive.text_file("A/C/D.TXT")?, "dee");
		assert_eq!(archive.binary_file("shaders/bullet.wgsl")?, b"@vertex fn main() {}");

		assert!(matches!(archive.locate("../x"), Err(InternalError::OutOfArchiveBounds(_))));
		assert!(matches!(archive.binary_file("a"), Err(InternalError::NotAFile(_))));
		assert!(matches!(archive.binary_file("a/nope.txt"), Err(InternalError::MissingResourceError(_))));

		let entry = archive.fetch_entry("shaders/bullet.wgsl")?;
		assert_eq!(entry.uncompressed_size, 20);
		assert_eq!(entry.crc, 0);

		let sub = archive.file_tree("a")?;
		assert_eq!(sub.paths().len(), 2);
		assert_eq!(archive.entries()?.len(), 3);
	}

	Ok(())
}

#[test]
fn open_close_lifecycle() -> InternalResult {
	let mut archive: FileArchive<Cursor<Vec<u8>>> = FileArchive::new();
	assert!(!archive.is_open());
	assert!(matches!(archive.binary_file("x"), Err(InternalError::ArchiveNotOpen)));
	assert!(matches!(archive.file_tree(""), Err(InternalError::ArchiveNotOpen)));

	let first = dump_to_vec(&[("one.txt", b"1")], &plain());
	let second = dump_to_vec(&[("two.txt", b"2")], &plain());

	archive.open(Cursor::new(first), "")?;
	// Already open, the second source is ignored
	archive.open(Cursor::new(second), "")?;
	assert_eq!(archive.text_file("one.txt")?, "1");
	assert!(archive.text_file("two.txt").is_err());

	assert!(archive.close().is_some());
	assert!(!archive.is_open());
	assert!(matches!(archive.text_file("one.txt"), Err(InternalError::ArchiveNotOpen)));
	assert!(archive.close().is_none());

	Ok(())
}

#[test]
#[cfg(all(feature = "crypto", feature = "compression"))]
fn wrong_password() {
	let config = PackConfig::default().password("right");
	let bytes = dump_to_vec(&[("a.txt", b"some text worth hiding")], &config);

	assert!(matches!(open(bytes, "wrong"), Err(InternalError::DirectoryTreeError(_))));
}

#[test]
fn truncated_payload_is_corruption() {
	for (encryption, compression) in codecs() {
		let key = hash_password("pw");
		let codec = Codec {
			key: &key,
			encryption,
			compression,
			level: 9,
		};

		let data = noise(1000, 9);
		let block = gen_block();
		let stored = codec.encode(&data, &block).unwrap();

		let header = FileHeader {
			uncompressed_size: data.len() as u64,
			compressed_size: stored.len() as u64,
			crc: 0,
			block,
		};

		assert_eq!(codec.decode(&stored, &header, "x").unwrap(), data);

		let truncated = &stored[..stored.len() - 1];
		assert!(
			matches!(codec.decode(truncated, &header, "x"), Err(InternalError::CorruptedFile { .. })),
			"{} / {}",
			encryption,
			compression
		);
	}
}

#[test]
fn shrunken_compressed_size_is_corruption() -> InternalResult {
	let mut bytes = dump_to_vec(&[("level1.dat", b"0123456789")], &plain());

	let offset = open(bytes.clone(), "")?.locate("level1.dat")? as usize;
	let size = u64::from_le_bytes(bytes[offset + 8..offset + 16].try_into().unwrap());
	bytes[offset + 8..offset + 16].copy_from_slice(&(size - 1).to_le_bytes());

	let mut archive = open(bytes, "")?;
	assert!(matches!(
		archive.binary_file("level1.dat"),
		Err(InternalError::CorruptedFile { .. })
	));

	Ok(())
}

#[test]
fn flipped_byte_goes_unnoticed_without_a_mac() -> InternalResult {
	// The format has no authentication tag: with neither codec, a flipped byte of the same length decodes fine
	let mut bytes = dump_to_vec(&[("save.dat", b"lives=3")], &plain());

	let offset = open(bytes.clone(), "")?.locate("save.dat")? as usize;
	let payload = offset + EntryHeader::BASE_SIZE;
	bytes[payload + 6] = b'9';

	let mut archive = open(bytes, "")?;
	assert_eq!(archive.binary_file("save.dat")?, b"lives=9");

	Ok(())
}

#[test]
fn unsupported_version_is_rejected_early() -> InternalResult {
	let scratch = tempfile::tempdir()?;
	let archive_path = scratch.path().join("future.pak");

	let mut bytes = dump_to_vec(&[("a.txt", b"a")], &plain());
	bytes[26..28].copy_from_slice(&99u16.to_le_bytes());
	// Scramble everything past minVersion, none of it should be looked at
	for byte in bytes[28..ArchiveHeader::BASE_SIZE].iter_mut() {
		*byte = 0xEE;
	}
	fs::write(&archive_path, &bytes)?;

	assert!(matches!(
		unpack(&archive_path, scratch.path().join("out"), ""),
		Err(InternalError::UnsupportedVersion(99))
	));
	assert!(!scratch.path().join("out").exists());
	assert!(matches!(open(bytes, ""), Err(InternalError::UnsupportedVersion(99))));

	Ok(())
}

#[test]
fn missing_directory_location() {
	let mut bytes = dump_to_vec(&[("a.txt", b"a")], &plain());
	bytes[35..43].copy_from_slice(&0u64.to_le_bytes());

	assert!(matches!(open(bytes, ""), Err(InternalError::DirectoryTreeError(_))));
}

#[test]
fn legacy_archives_are_readable() -> InternalResult {
	let bytes = legacy_archive(&[("cfg/game.ini", b"[video]\nvsync=1\n"), ("bgm/stage1.mid", b"MThd")]);

	let scratch = tempfile::tempdir()?;
	let archive_path = scratch.path().join("legacy.pak");
	fs::write(&archive_path, &bytes)?;

	let mut archive = open(bytes, "")?;
	assert_eq!(archive.header()?.min_version, 0);
	assert_eq!(archive.text_file("CFG/game.ini")?, "[video]\nvsync=1\n");

	unpack(&archive_path, scratch.path().join("out"), "")?;
	assert_eq!(fs::read(scratch.path().join("out/bgm/stage1.mid"))?, b"MThd");

	Ok(())
}

#[test]
fn hostile_names_cannot_escape_on_unpack() -> InternalResult {
	let mut bytes = legacy_archive(&[("xx", b"boom")]);

	// Rename the entry to `..` in place, the tree keeps its length
	let position = bytes.windows(4).position(|w| w == b"\"xx\"").unwrap();
	bytes[position + 1..position + 3].copy_from_slice(b"..");

	let scratch = tempfile::tempdir()?;
	let mut archive = open(bytes, "")?;

	assert!(matches!(
		archive.unpack_to(scratch.path().join("out")),
		Err(InternalError::OutOfArchiveBounds(_))
	));

	Ok(())
}

#[test]
fn tree_offsets_are_validated() {
	let mut bytes = legacy_archive(&[("a", b"a")]);
	let len = bytes.len() as u64;

	let start = ArchiveHeader::BASE_SIZE;

	// Past the end of the file, then into the embedded tree itself
	for offset in [len + 100, start as u64, start as u64 + 4] {
		let mut tree = DirTree::new();
		tree.insert("a", offset).unwrap();
		let json = tree.to_json().unwrap();

		let mut bytes = bytes.clone();
		bytes[start..start + json.len()].copy_from_slice(json.as_bytes());

		assert!(
			matches!(open(bytes, ""), Err(InternalError::DirectoryTreeError(_))),
			"offset {} was accepted",
			offset
		);
	}

	// The first byte after the tree is where the data region starts
	let tree_len = bytes.len() - start - EntryHeader::BASE_SIZE - 1;
	let mut tree = DirTree::new();
	tree.insert("a", (start + tree_len) as u64).unwrap();
	let json = tree.to_json().unwrap();
	bytes[start..start + json.len()].copy_from_slice(json.as_bytes());

	assert!(open(bytes, "").is_ok());
}

#[test]
fn single_file_roundtrip() -> InternalResult {
	let scratch = tempfile::tempdir()?;

	for (encryption, compression) in codecs() {
		let config = PackConfig::default()
			.password("slot-1")
			.encryption(encryption)
			.compression(compression);

		let save = noise(3000, 4);
		let path = scratch.path().join("save.bin");
		save_encrypted_binary_file(&path, &save, &config)?;
		assert_eq!(load_encrypted_binary_file(&path, "slot-1")?, save);

		let path = scratch.path().join("notes.txt");
		save_encrypted_text_file(&path, "stage 4 cleared", &config)?;
		assert_eq!(load_encrypted_text_file(&path, "slot-1")?, "stage 4 cleared");

		let path = scratch.path().join("empty.bin");
		save_encrypted_binary_file(&path, &[], &config)?;
		assert!(load_encrypted_binary_file(&path, "slot-1")?.is_empty());
	}

	Ok(())
}

#[test]
fn single_and_multi_file_apis_do_not_mix() -> InternalResult {
	let mut sealed = Cursor::new(Vec::new());
	seal(&mut sealed, b"blob", &plain())?;

	let bytes = sealed.into_inner();
	let header = ArchiveHeader::from_handle(bytes.as_slice())?;
	assert!(header.flags.contains(Flags::SINGLE_FILE_ARCHIVE));
	assert_eq!(header.dir_header_loc, 0);

	assert!(matches!(open(bytes.clone(), ""), Err(InternalError::NotMultiFileArchive)));
	assert_eq!(unseal(Cursor::new(bytes), "", &ArchiveConfig::default())?, b"blob");

	let multi = dump_to_vec(&[("a", b"a")], &plain());
	assert!(matches!(
		unseal(Cursor::new(multi), "", &ArchiveConfig::default()),
		Err(InternalError::NotSingleFileArchive)
	));

	Ok(())
}

#[test]
fn blocks_are_unique() -> InternalResult {
	let files: Vec<(String, Vec<u8>)> = (0..64).map(|i| (format!("bullets/{}.png", i), vec![i as u8; 10])).collect();
	let borrowed: Vec<(&str, &[u8])> = files.iter().map(|(p, d)| (p.as_str(), d.as_slice())).collect();

	let mut archive = open(dump_to_vec(&borrowed, &plain()), "")?;

	let mut blocks = std::collections::HashSet::new();
	for (path, _) in archive.entries()? {
		assert!(blocks.insert(archive.fetch_entry(&path)?.block));
	}

	assert_eq!(blocks.len(), 64);
	Ok(())
}

#[test]
fn entry_sizes_are_clamped() -> InternalResult {
	let mut bytes = dump_to_vec(&[("big.bin", &[7u8; 4096])], &plain());

	let mut archive = FileArchive::with_config(ArchiveConfig::default().max_entry_size(1024));
	archive.open(Cursor::new(bytes.clone()), "")?;
	assert!(matches!(
		archive.binary_file("big.bin"),
		Err(InternalError::EntryTooLarge { size: 4096, limit: 1024 })
	));

	// A compressed size running past the end of the source is refused before allocation
	let offset = open(bytes.clone(), "")?.locate("big.bin")? as usize;
	bytes[offset + 8..offset + 16].copy_from_slice(&u64::MAX.to_le_bytes());

	let mut archive = open(bytes, "")?;
	assert!(matches!(archive.binary_file("big.bin"), Err(InternalError::EntryTooLarge { .. })));

	Ok(())
}

#[test]
fn duplicate_ids_write_nothing() {
	let mut leaves = [Leaf::new(b"1".as_slice(), "a/b"), Leaf::new(b"2".as_slice(), "a/b")];
	let mut target = Cursor::new(Vec::new());

	let result = dump(&mut target, &mut leaves, &plain(), None);
	assert!(matches!(result, Err(InternalError::DuplicateLeafID(_))));
	assert!(target.get_ref().is_empty());

	let mut leaves = [Leaf::new(b"1".as_slice(), "a"), Leaf::new(b"2".as_slice(), "a/b")];
	assert!(matches!(
		dump(Cursor::new(Vec::new()), &mut leaves, &plain(), None),
		Err(InternalError::DuplicateLeafID(_))
	));
}

#[test]
fn dump_callback_and_layout() -> InternalResult {
	let mut seen = Vec::new();
	let mut callback = |id: &str, header: &FileHeader| seen.push((id.to_string(), header.uncompressed_size));

	let mut leaves = [Leaf::new(b"abc".as_slice(), "x.txt"), Leaf::new(b"".as_slice(), "y/z.txt")];
	let mut target = Cursor::new(Vec::new());
	dump(&mut target, &mut leaves, &plain(), Some(&mut callback))?;

	assert_eq!(seen, vec![("x.txt".to_string(), 3), ("y/z.txt".to_string(), 0)]);

	// The first entry sits right after the header, and both are plain
	let bytes = target.into_inner();
	let first = ArchiveHeader::BASE_SIZE;
	assert_eq!(&bytes[first..first + 8], &3u64.to_le_bytes());
	assert_eq!(&bytes[first + EntryHeader::BASE_SIZE..first + EntryHeader::BASE_SIZE + 3], b"abc");

	let mut archive = open(bytes, "")?;
	assert_eq!(archive.locate("x.txt")?, first as u64);
	assert!(archive.binary_file("y/z.txt")?.is_empty());

	Ok(())
}

#[test]
fn packing_into_the_source_folder_skips_the_archive() -> InternalResult {
	let source = tempfile::tempdir()?;
	write_tree(source.path(), &[("a.txt", b"a".to_vec())]);

	let archive_path = source.path().join("self.pak");
	pack(&archive_path, source.path(), &plain())?;

	let archive = FileArchive::from_path(&archive_path, "")?;
	assert_eq!(archive.entries()?.into_iter().map(|(p, _)| p).collect::<Vec<_>>(), vec!["a.txt"]);

	Ok(())
}

#[test]
#[cfg(feature = "crypto")]
fn password_hashing_and_key_padding() {
	assert_eq!(
		hash_password(""),
		[
			0xa7, 0xff, 0xc6, 0xf8, 0xbf, 0x1e, 0xd7, 0x66, 0x51, 0xc1, 0x47, 0x56, 0xa0, 0x61, 0xd6, 0x62, 0xf5, 0x80,
			0xff, 0x4d, 0xe4, 0x3b, 0x49, 0xfa, 0x82, 0xd8, 0x0a, 0x4b, 0x80, 0xf8, 0x43, 0x4a
		]
	);

	let iv = [3u8; 16];
	let data = b"stage data";
	let aes = EncryptionAlgorithm::Aes256;

	// Short keys are zero padded
	let padded = crate::format::encrypt(data, b"abc", aes, &iv).unwrap();
	let mut key = [0u8; 32];
	key[..3].copy_from_slice(b"abc");
	let explicit = crate::format::encrypt(data, &key, aes, &iv).unwrap();
	assert_eq!(padded, explicit);

	// Long keys are truncated
	let long = [9u8; 48];
	let truncated = crate::format::encrypt(data, &long, aes, &iv).unwrap();
	assert_eq!(truncated, crate::format::encrypt(data, &long[..32], aes, &iv).unwrap());
	assert_eq!(crate::format::decrypt(&truncated, &long, aes, &iv).unwrap(), data);

	// Same key, different IV, different ciphertext
	assert_ne!(truncated, crate::format::encrypt(data, &long, aes, &[4u8; 16]).unwrap());

	let empty = crate::format::encrypt(&[], &long, aes, &iv).unwrap();
	assert_eq!(crate::format::decrypt(&empty, &long, aes, &iv).unwrap(), b"");
}

#[test]
fn crc_flag_is_accepted_but_not_enforced() -> InternalResult {
	let mut bytes = dump_to_vec(&[("a.txt", b"abc")], &plain());

	// Request CRC checks after the fact and store a bogus checksum
	let flags = u32::from_le_bytes(bytes[31..35].try_into().unwrap()) | Flags::SHOULD_CHECK_CRC;
	bytes[31..35].copy_from_slice(&flags.to_le_bytes());

	let offset = open(bytes.clone(), "")?.locate("a.txt")? as usize;
	bytes[offset + 16..offset + 20].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());

	let mut archive = open(bytes, "")?;
	assert!(archive.header()?.flags.contains(Flags::SHOULD_CHECK_CRC));
	assert_eq!(archive.fetch_entry("a.txt")?.crc, 0xDEAD_BEEF);
	assert_eq!(archive.binary_file("a.txt")?, b"abc");

	// Same for the single-file variant
	let mut sealed = Cursor::new(Vec::new());
	seal(&mut sealed, b"blob", &plain().flags(Flags::from_bits(Flags::SHOULD_CHECK_CRC)))?;

	let mut sealed = sealed.into_inner();
	let entry = ArchiveHeader::BASE_SIZE;
	sealed[entry + 16..entry + 20].copy_from_slice(&7u32.to_le_bytes());

	let header = ArchiveHeader::from_handle(sealed.as_slice())?;
	assert!(header.flags.contains(Flags::SHOULD_CHECK_CRC));
	assert!(header.flags.contains(Flags::SINGLE_FILE_ARCHIVE));
	assert_eq!(unseal(Cursor::new(sealed), "", &ArchiveConfig::default())?, b"blob");

	Ok(())
}

#[test]
fn pack_config_flags_reach_the_header() -> InternalResult {
	// The single-file bit is owned by the writer, asking for it in a multi-file archive is ignored
	let mut flags = Flags::default();
	flags.set(Flags::SHOULD_CHECK_CRC | Flags::SINGLE_FILE_ARCHIVE, true);

	let bytes = dump_to_vec(&[("a.txt", b"abc")], &plain().flags(flags));

	let mut archive = open(bytes, "")?;
	let header_flags = archive.header()?.flags;
	assert!(header_flags.contains(Flags::SHOULD_CHECK_CRC));
	assert!(!header_flags.contains(Flags::SINGLE_FILE_ARCHIVE));
	assert_eq!(archive.text_file("a.txt")?, "abc");

	Ok(())
}

#[test]
#[cfg(target_os = "linux")]
fn non_utf8_file_names_are_refused() -> InternalResult {
	use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

	let source = tempfile::tempdir()?;
	fs::write(source.path().join(OsStr::from_bytes(b"bad\xFFname.bin")), b"x")?;

	assert!(matches!(
		leaves_from_dir(source.path(), None),
		Err(InternalError::OtherError(_))
	));

	let scratch = tempfile::tempdir()?;
	assert!(pack(scratch.path().join("out.pak"), source.path(), &plain()).is_err());

	Ok(())
}
