//! Mesh file I/O.
//!
//! Readers turn a byte stream into a mesh value and writers serialize one.
//! Both traits carry `*_path` helpers that open buffered files.

pub mod gmsh;
pub mod xdmf;

use crate::mesh_error::MeshSubsetError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Trait for mesh readers.
pub trait MeshReader {
    /// Value produced by the reader.
    type Output;

    /// Parse a mesh from `reader`.
    fn read<R: Read>(&self, reader: R) -> Result<Self::Output, MeshSubsetError>;

    /// Parse the mesh stored at `path`.
    fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Self::Output, MeshSubsetError> {
        let file = File::open(path.as_ref())?;
        self.read(BufReader::new(file))
    }
}

/// Trait for mesh writers.
pub trait MeshWriter {
    /// Value consumed by the writer.
    type Input;

    /// Serialize `mesh` into `writer`.
    fn write<W: Write>(&self, writer: W, mesh: &Self::Input) -> Result<(), MeshSubsetError>;

    /// Serialize `mesh` into a newly created file at `path`.
    fn write_path<P: AsRef<Path>>(
        &self,
        path: P,
        mesh: &Self::Input,
    ) -> Result<(), MeshSubsetError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer, mesh)?;
        writer.flush()?;
        Ok(())
    }
}
