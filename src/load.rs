use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{Activity, Ref, ScheduleStatus, WeeklySchedule};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid CSV in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an exported `/aulas` response.
pub fn load_schedules(path: &Path) -> Result<Vec<WeeklySchedule>, LoadError> {
    let schedules: Vec<WeeklySchedule> = load_json(path)?;
    tracing::info!(path = %path.display(), count = schedules.len(), "loaded schedules");
    Ok(schedules)
}

/// Reads an exported `/atividades` response.
pub fn load_activities(path: &Path) -> Result<Vec<Activity>, LoadError> {
    let activities: Vec<Activity> = load_json(path)?;
    tracing::info!(path = %path.display(), count = activities.len(), "loaded activities");
    Ok(activities)
}

pub fn import_schedules_csv(path: &Path) -> Result<Vec<WeeklySchedule>, LoadError> {
    #[derive(Deserialize)]
    struct CsvRow {
        id: String,
        dia_semana: u32,
        horario_inicio: String,
        horario_fim: String,
        semestre: Option<String>,
        status: Option<ScheduleStatus>,
        turma_id: String,
        materia_id: String,
        professor_id: Option<String>,
        #[serde(default)]
        turma_nome: Option<String>,
        #[serde(default)]
        materia_nome: Option<String>,
    }

    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let mut schedules = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result.map_err(csv_error)?;
        schedules.push(WeeklySchedule {
            id: row.id,
            day_of_week: row.dia_semana,
            start_time: row.horario_inicio,
            end_time: row.horario_fim,
            semester: row
                .semestre
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            status: row.status.unwrap_or_default(),
            class_group: Ref {
                id: row.turma_id,
                name: row.turma_nome,
            },
            subject: Ref {
                id: row.materia_id,
                name: row.materia_nome,
            },
            teacher: row.professor_id.filter(|p| !p.is_empty()).map(Ref::new),
        });
    }

    tracing::info!(path = %path.display(), count = schedules.len(), "imported schedules from CSV");
    Ok(schedules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn imports_csv_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "id,dia_semana,horario_inicio,horario_fim,semestre,status,turma_id,materia_id,professor_id,turma_nome,materia_nome"
        )
        .unwrap();
        writeln!(file, "a1,1,08:00,09:00,1,ativo,t1,m1,p1,9A,Math").unwrap();
        writeln!(file, "a2,3,10:00,11:00,,inativo,t1,m2,,,").unwrap();
        writeln!(file, "a3,4,10:00,11:00, 2 ,ativo,t1,m2,,,").unwrap();
        file.flush().unwrap();

        let schedules = import_schedules_csv(file.path()).unwrap();
        assert_eq!(schedules.len(), 3);
        assert_eq!(schedules[0].class_group.label(), "9A");
        assert_eq!(schedules[0].teacher, Some(Ref::new("p1")));
        assert!(schedules[0].is_active());
        assert_eq!(schedules[1].semester, None);
        assert_eq!(schedules[2].semester.as_deref(), Some("2"));
        assert_eq!(schedules[1].teacher, None);
        assert!(!schedules[1].is_active());
    }

    #[test]
    fn loads_json_exports() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"_id": "x1", "nome": "Trabalho", "data": "2025-04-02", "tipo": "trabalho",
                 "materiaId": {{"_id": "m1", "nome": "Math"}}, "turmaId": "t1", "semestre": "1"}}]"#
        )
        .unwrap();
        file.flush().unwrap();

        let activities = load_activities(file.path()).unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].subject.label(), "Math");
    }

    #[test]
    fn reports_the_failing_path() {
        let err = load_schedules(Path::new("/nonexistent/aulas.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/aulas.json"));
    }
}
