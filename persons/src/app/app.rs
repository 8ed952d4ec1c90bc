use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{
    consts::consts::{IdAllocator, APP_TITLE},
    model::{
        generator::{generate_random_persons, seed_persons},
        person::Person,
        update::{EditError, PersonUpdate},
    },
    persistence::{
        file::{load_persons, save_persons, PersistenceError},
        preferences::PreferencesStore,
    },
};

use super::{
    events::{ChangeEvent, ChangeListener},
    options::AppOptions,
    statistics::BirthdayStatistics,
};

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Could not load data from file:\n{0}")]
    CouldNotLoad(PathBuf, #[source] PersistenceError),

    #[error("Could not save data to file:\n{0}")]
    CouldNotSave(PathBuf, #[source] PersistenceError),

    #[error("No file to save to, choose a file first")]
    NoCurrentFile,

    #[error(transparent)]
    Edit(#[from] EditError),
}

impl ShellError {
    /// Short headline for error reports
    pub fn header(&self) -> &'static str {
        match self {
            ShellError::CouldNotLoad(_, _) => "Could not load data",
            ShellError::CouldNotSave(_, _) | ShellError::NoCurrentFile => "Could not save data",
            ShellError::Edit(_) => "Could not edit person",
        }
    }
}

/// Application state behind every front end.
///
/// Owns the person list, the id allocator, the current file and the stored
/// preferences. Every mutation goes through here so subscribers and the
/// dirty flag stay in sync with the list.
pub struct PersonsApp {
    persons: Vec<Person>,
    ids: IdAllocator,
    file_path: Option<PathBuf>,
    preferences: PreferencesStore,
    options: AppOptions,
    dirty: bool,
    listeners: Vec<ChangeListener>,
}

impl PersonsApp {
    pub fn new(options: AppOptions) -> Self {
        Self {
            persons: Vec::new(),
            ids: IdAllocator::new(),
            file_path: None,
            preferences: PreferencesStore::new(options.preferences_path.clone()),
            options,
            dirty: false,
            listeners: Vec::new(),
        }
    }

    /// Random persons when configured, otherwise the last opened file, otherwise the seed list.
    ///
    /// When the last opened file cannot be read the error is returned and the
    /// list stays empty.
    pub fn load_initial_data(&mut self) -> Result<(), ShellError> {
        if let Some(number) = self.options.random_persons {
            let persons = match generate_random_persons(
                number,
                &self.options.first_names_path,
                &self.options.last_names_path,
                &mut self.ids,
                &mut rand::thread_rng(),
            ) {
                Ok(persons) => persons,
                Err(e) => {
                    log::warn!("Could not generate random persons: {}", e);
                    Vec::new()
                }
            };

            self.replace_persons(persons);

            return Ok(());
        }

        match self.preferences.person_file_path() {
            Ok(Some(file_path)) => return self.open(&file_path),
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring preferences: {}", e),
        }

        log::info!("No persons data found, generated artificially");

        let persons = seed_persons(&mut self.ids);
        self.replace_persons(persons);

        Ok(())
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn person(&self, index: usize) -> Option<&Person> {
        self.persons.get(index)
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Whether there are changes that were not saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn title(&self) -> String {
        match self.file_path.as_ref().and_then(|path| path.file_name()) {
            Some(file_name) => format!("{} - {}", APP_TITLE, file_name.to_string_lossy()),
            None => APP_TITLE.to_string(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Appends a person with placeholder details, returns its position
    pub fn add_person(&mut self, first_name: Option<String>, last_name: Option<String>) -> usize {
        let person = Person::new(self.ids.allocate(), first_name, last_name);

        self.push_person(person)
    }

    /// Appends a blank person with `update` applied, like confirming a "new person" dialog
    pub fn create_person(&mut self, update: &PersonUpdate) -> Result<usize, ShellError> {
        let mut person = Person::new(self.ids.allocate(), None, None);

        update.apply(&mut person)?;

        Ok(self.push_person(person))
    }

    pub fn update_person(&mut self, index: usize, update: &PersonUpdate) -> Result<(), ShellError> {
        let person = self
            .persons
            .get_mut(index)
            .ok_or(EditError::DoesNotExist(index))?;

        update.apply(person)?;

        let id = person.id();
        self.notify(ChangeEvent::Updated { index, id });

        Ok(())
    }

    pub fn delete_person(&mut self, index: usize) -> Result<Person, ShellError> {
        if index >= self.persons.len() {
            return Err(EditError::DoesNotExist(index).into());
        }

        let person = self.persons.remove(index);

        self.notify(ChangeEvent::Removed {
            index,
            id: person.id(),
        });

        Ok(person)
    }

    /// Empties the list and forgets the current file
    pub fn new_document(&mut self) {
        self.file_path = None;
        self.remember_file_path(None);
        self.replace_persons(Vec::new());
    }

    /// Replaces the list with the contents of `path`. On failure the list is left as it was.
    pub fn open(&mut self, path: &Path) -> Result<(), ShellError> {
        let persons = load_persons(path, &mut self.ids)
            .map_err(|e| ShellError::CouldNotLoad(path.to_path_buf(), e))?;

        self.file_path = Some(path.to_path_buf());
        self.remember_file_path(Some(path));
        self.replace_persons(persons);

        Ok(())
    }

    /// Saves to the current file
    pub fn save(&mut self) -> Result<(), ShellError> {
        let file_path = self.file_path.clone().ok_or(ShellError::NoCurrentFile)?;

        self.save_as(&file_path)
    }

    /// Saves to `path` and makes it the current file
    pub fn save_as(&mut self, path: &Path) -> Result<(), ShellError> {
        save_persons(path, &self.persons)
            .map_err(|e| ShellError::CouldNotSave(path.to_path_buf(), e))?;

        self.file_path = Some(path.to_path_buf());
        self.remember_file_path(Some(path));
        self.notify(ChangeEvent::Saved(path.to_path_buf()));

        Ok(())
    }

    pub fn birthday_statistics(&self) -> BirthdayStatistics {
        BirthdayStatistics::from_persons(&self.persons)
    }

    fn push_person(&mut self, person: Person) -> usize {
        let index = self.persons.len();
        let id = person.id();

        self.persons.push(person);
        self.notify(ChangeEvent::Added { index, id });

        index
    }

    fn replace_persons(&mut self, persons: Vec<Person>) {
        self.persons = persons;

        let count = self.persons.len();
        self.notify(ChangeEvent::Replaced { count });
    }

    // The data itself is already on disk, a lost preference only costs the
    // "last file" shortcut on the next start
    fn remember_file_path(&self, path: Option<&Path>) {
        if let Err(e) = self.preferences.set_person_file_path(path) {
            log::warn!("Could not remember file path: {}", e);
        }
    }

    fn notify(&mut self, event: ChangeEvent) {
        log::debug!("{:?}", event);

        self.dirty = event.marks_dirty();

        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, fs, rc::Rc};

    use crate::model::update::UpdateStatement;

    use super::*;

    fn app_with_seed_data() -> PersonsApp {
        let mut app = PersonsApp::new(AppOptions::new_test());
        app.load_initial_data().unwrap();
        app
    }

    fn recorded_events(app: &mut PersonsApp) -> Rc<RefCell<Vec<ChangeEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();

        app.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        events
    }

    mod initial_data {
        use super::*;

        #[test]
        fn no_preferences_loads_seed_list() {
            let app = app_with_seed_data();

            assert_eq!(app.len(), 9);
            assert_eq!(app.person(0).unwrap().first_name(), Some("Hans"));
            assert_eq!(app.current_file(), None);
            assert_eq!(app.title(), "Persons App");
            assert!(!app.is_dirty());
        }

        #[test]
        fn remembered_file_is_loaded() {
            // Given a file saved by a previous run
            let options = AppOptions::new_test();
            let file_path = options.test_directory().join("persons.xml");

            let mut previous_run = PersonsApp::new(options.clone());
            previous_run.load_initial_data().unwrap();
            previous_run.delete_person(0).unwrap();
            previous_run.save_as(&file_path).unwrap();

            // When a new run starts with the same preferences
            let mut app = PersonsApp::new(options);
            app.load_initial_data().unwrap();

            // Then it picks up that file
            assert_eq!(app.len(), 8);
            assert_eq!(app.persons(), previous_run.persons());
            assert_eq!(app.current_file(), Some(file_path.as_path()));
            assert_eq!(app.title(), "Persons App - persons.xml");
        }

        #[test]
        fn unreadable_remembered_file_reports_error_and_stays_empty() {
            let options = AppOptions::new_test();
            let missing = options.test_directory().join("gone.xml");
            PreferencesStore::new(options.preferences_path.clone())
                .set_person_file_path(Some(&missing))
                .unwrap();

            let mut app = PersonsApp::new(options);
            let result = app.load_initial_data();

            assert!(matches!(result, Err(ShellError::CouldNotLoad(path, _)) if path == missing));
            assert!(app.is_empty());
        }

        #[test]
        fn random_mode_uses_word_lists() {
            let options = AppOptions::new_test();
            let directory = options.test_directory();
            fs::create_dir_all(&directory).unwrap();
            fs::write(directory.join("first.txt"), "Anna\n").unwrap();
            fs::write(directory.join("last.txt"), "Best\n").unwrap();

            let options = options
                .set_random_persons(Some(3))
                .set_word_lists(directory.join("first.txt"), directory.join("last.txt"));

            let mut app = PersonsApp::new(options);
            app.load_initial_data().unwrap();

            assert_eq!(app.len(), 3);
            assert!(app
                .persons()
                .iter()
                .all(|p| p.first_name() == Some("Anna") && p.last_name() == Some("Best")));
        }

        #[test_log::test]
        fn random_mode_without_word_lists_starts_empty() {
            let options = AppOptions::new_test().set_random_persons(Some(5)).set_word_lists(
                PathBuf::from("/tmp/persons-app/missing-first.txt"),
                PathBuf::from("/tmp/persons-app/missing-last.txt"),
            );

            let mut app = PersonsApp::new(options);

            app.load_initial_data()
                .expect("generator failures are only logged");

            assert!(app.is_empty());
        }
    }

    mod edit {
        use super::*;

        #[test]
        fn add_appends_with_fresh_id() {
            let mut app = app_with_seed_data();
            let events = recorded_events(&mut app);

            let index = app.add_person(Some("Lara".to_string()), None);

            assert_eq!(index, 9);
            let added = app.person(index).unwrap();
            assert_eq!(added.first_name(), Some("Lara"));
            assert!(app.persons()[..9].iter().all(|p| p.id() != added.id()));
            assert!(app.is_dirty());
            assert_eq!(
                events.borrow().as_slice(),
                &[ChangeEvent::Added {
                    index: 9,
                    id: added.id()
                }]
            );
        }

        #[test]
        fn create_applies_dialog_values() {
            let mut app = app_with_seed_data();

            let update = PersonUpdate {
                first_name: UpdateStatement::Set("Lara".to_string()),
                last_name: UpdateStatement::Set("Croft".to_string()),
                city: UpdateStatement::Set("London".to_string()),
                ..Default::default()
            };

            let index = app.create_person(&update).unwrap();

            let created = app.person(index).unwrap();
            assert_eq!(created.last_name(), Some("Croft"));
            assert_eq!(created.city(), "London");
        }

        #[test]
        fn update_edits_in_place() {
            let mut app = app_with_seed_data();
            let events = recorded_events(&mut app);
            let id = app.person(2).unwrap().id();

            let update = PersonUpdate {
                street: UpdateStatement::Set("Hauptstrasse 5".to_string()),
                ..Default::default()
            };

            app.update_person(2, &update).unwrap();

            assert_eq!(app.person(2).unwrap().street(), "Hauptstrasse 5");
            assert_eq!(app.person(2).unwrap().id(), id);
            assert_eq!(
                events.borrow().as_slice(),
                &[ChangeEvent::Updated { index: 2, id }]
            );
        }

        #[test]
        fn update_out_of_range_is_rejected() {
            let mut app = app_with_seed_data();

            let result = app.update_person(42, &PersonUpdate::default());

            assert!(matches!(
                result,
                Err(ShellError::Edit(EditError::DoesNotExist(42)))
            ));
            assert!(!app.is_dirty());
        }

        #[test]
        fn delete_removes_and_returns_person() {
            let mut app = app_with_seed_data();

            let removed = app.delete_person(0).unwrap();

            assert_eq!(removed.first_name(), Some("Hans"));
            assert_eq!(app.len(), 8);
            assert_eq!(app.person(0).unwrap().first_name(), Some("Ruth"));
        }

        #[test]
        fn delete_out_of_range_is_rejected() {
            let mut app = PersonsApp::new(AppOptions::new_test());

            let result = app.delete_person(0);

            assert!(matches!(
                result,
                Err(ShellError::Edit(EditError::DoesNotExist(0)))
            ));
        }
    }

    mod files {
        use super::*;

        #[test]
        fn save_without_file_is_rejected() {
            let mut app = app_with_seed_data();

            let result = app.save();

            assert!(matches!(result, Err(ShellError::NoCurrentFile)));
        }

        #[test]
        fn save_as_clears_dirty_and_sets_title() {
            let mut app = app_with_seed_data();
            let file_path = app.options.test_directory().join("contacts.xml");
            app.add_person(None, None);

            app.save_as(&file_path).unwrap();

            assert!(!app.is_dirty());
            assert_eq!(app.title(), "Persons App - contacts.xml");

            // Later saves go to the same file
            app.delete_person(0).unwrap();
            app.save().unwrap();

            let mut reopened = PersonsApp::new(AppOptions::new_test());
            reopened.open(&file_path).unwrap();
            assert_eq!(reopened.persons(), app.persons());
        }

        #[test]
        fn failed_open_keeps_prior_state() {
            // Given an app with data and a corrupt file
            let mut app = app_with_seed_data();
            let corrupt = app.options.test_directory().join("corrupt.xml");
            fs::create_dir_all(corrupt.parent().unwrap()).unwrap();
            fs::write(&corrupt, "<persons><person>").unwrap();
            let before = app.persons().to_vec();

            // When opening it fails
            let result = app.open(&corrupt);

            // Then nothing changed
            assert!(matches!(result, Err(ShellError::CouldNotLoad(_, _))));
            assert_eq!(app.persons(), before.as_slice());
            assert_eq!(app.current_file(), None);
        }

        #[test]
        fn failed_save_keeps_dirty_flag() {
            let mut app = app_with_seed_data();
            let directory = app.options.test_directory();
            fs::create_dir_all(&directory).unwrap();

            // A regular file where the parent directory should be
            let blocker = directory.join("blocker");
            fs::write(&blocker, "").unwrap();

            app.add_person(None, None);
            let result = app.save_as(&blocker.join("persons.xml"));

            assert!(matches!(result, Err(ShellError::CouldNotSave(_, _))));
            assert_eq!(result.unwrap_err().header(), "Could not save data");
            assert!(app.is_dirty());
            assert_eq!(app.current_file(), None);
        }

        #[test]
        fn new_document_forgets_file() {
            let mut app = app_with_seed_data();
            let file_path = app.options.test_directory().join("persons.xml");
            app.save_as(&file_path).unwrap();

            app.new_document();

            assert!(app.is_empty());
            assert_eq!(app.current_file(), None);
            assert_eq!(app.preferences.person_file_path().unwrap(), None);
        }

        #[test]
        fn open_assigns_fresh_ids() {
            let mut app = app_with_seed_data();
            let file_path = app.options.test_directory().join("persons.xml");
            app.save_as(&file_path).unwrap();
            let old_ids: Vec<_> = app.persons().iter().map(|p| p.id()).collect();

            app.open(&file_path).unwrap();

            assert!(app.persons().iter().all(|p| !old_ids.contains(&p.id())));
        }
    }

    #[test]
    fn statistics_cover_current_list() {
        let app = app_with_seed_data();

        let statistics = app.birthday_statistics();

        assert_eq!(statistics.total(), 0);
        assert_eq!(statistics.without_birthday(), 9);
    }
}
