// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::write;
use std::path::PathBuf;

use tempfile::tempdir;

use crate::error::Fallible;

/// Creates a fresh directory that outlives the test.
pub fn create_tmp_directory() -> Fallible<PathBuf> {
    let path: PathBuf = tempdir()?.keep();
    Ok(path.canonicalize()?)
}

/// Creates a collection directory with a small vocabulary deck.
pub fn create_tmp_collection(words: &[(&str, &str)]) -> Fallible<PathBuf> {
    let directory = create_tmp_directory()?;
    let mut contents = String::new();
    for (text, meaning) in words {
        contents.push_str(&format!(
            "[[word]]\ntext = \"{text}\"\nmeaning = \"{meaning}\"\n\n"
        ));
    }
    write(directory.join("deck.toml"), contents)?;
    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_collection() -> Fallible<()> {
        let directory = create_tmp_collection(&[("猫", "cat")])?;
        assert!(directory.join("deck.toml").exists());
        Ok(())
    }
}
